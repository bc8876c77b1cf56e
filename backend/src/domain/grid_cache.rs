//! Bounded cache of month grids keyed by year-month.
//!
//! Grids depend on the month and on the available height only, so the
//! cache is cleared when the height changes and otherwise evicts the least
//! recently used month.

use cached::{Cached, SizedCache};
use log::debug;
use shared::{MonthGrid, YearMonth};

use super::calendar::CalendarService;

pub struct MonthGridCache {
    service: CalendarService,
    available_height: f32,
    grids: SizedCache<YearMonth, MonthGrid>,
}

impl MonthGridCache {
    pub fn new(service: CalendarService, capacity: usize, available_height: f32) -> Self {
        Self {
            service,
            available_height,
            grids: SizedCache::with_size(capacity.max(1)),
        }
    }

    pub fn available_height(&self) -> f32 {
        self.available_height
    }

    /// Returns true when the height changed and the cache was invalidated
    pub fn set_available_height(&mut self, available_height: f32) -> bool {
        if self.available_height == available_height {
            return false;
        }
        debug!(
            "Available height changed {} -> {}, dropping {} cached grids",
            self.available_height,
            available_height,
            self.grids.cache_size()
        );
        self.available_height = available_height;
        self.grids.cache_clear();
        true
    }

    /// Cached grid for `month`, computed on a miss
    pub fn grid(&mut self, month: YearMonth) -> MonthGrid {
        let service = self.service;
        let available_height = self.available_height;
        *self
            .grids
            .cache_get_or_set_with(month, || service.month_grid(month, available_height))
    }

    /// Derive grids for `center` and `radius` months on either side.
    ///
    /// `center` is touched last so it is the most recently used entry.
    pub fn prefetch_around(&mut self, center: YearMonth, radius: u32) {
        let radius = radius as i32;
        for offset in (-radius..=radius).filter(|offset| *offset != 0) {
            self.grid(center.plus_months(offset));
        }
        self.grid(center);
    }

    pub fn contains(&self, month: &YearMonth) -> bool {
        self.grids.key_order().any(|cached| cached == month)
    }

    pub fn len(&self) -> usize {
        self.grids.cache_size()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Weekday;

    fn ym(year: i32, month: u32) -> YearMonth {
        YearMonth::new(year, month).unwrap()
    }

    #[test]
    fn test_grid_is_computed_and_cached() {
        let mut cache = MonthGridCache::new(CalendarService::default(), 3, 600.0);
        assert!(cache.is_empty());

        let grid = cache.grid(ym(2024, 3));
        assert_eq!(grid.week_count, 6);
        assert_eq!(grid.row_height, 100.0);
        assert!(cache.contains(&ym(2024, 3)));
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_prefetch_around_year_boundary() {
        let mut cache = MonthGridCache::new(CalendarService::default(), 5, 600.0);
        cache.prefetch_around(ym(2025, 1), 1);

        assert_eq!(cache.len(), 3);
        assert!(cache.contains(&ym(2024, 12)));
        assert!(cache.contains(&ym(2025, 1)));
        assert!(cache.contains(&ym(2025, 2)));
    }

    #[test]
    fn test_least_recently_used_month_is_evicted() {
        let mut cache = MonthGridCache::new(CalendarService::default(), 3, 600.0);
        cache.prefetch_around(ym(2024, 6), 1);
        cache.grid(ym(2024, 8));

        assert_eq!(cache.len(), 3);
        assert!(!cache.contains(&ym(2024, 5)));
        assert!(cache.contains(&ym(2024, 6)));
        assert!(cache.contains(&ym(2024, 8)));
    }

    #[test]
    fn test_height_change_invalidates() {
        let mut cache = MonthGridCache::new(CalendarService::new(Weekday::Sun), 5, 600.0);
        cache.prefetch_around(ym(2024, 2), 1);

        assert!(!cache.set_available_height(600.0));
        assert_eq!(cache.len(), 3);

        assert!(cache.set_available_height(500.0));
        assert!(cache.is_empty());
        assert_eq!(cache.grid(ym(2024, 2)).row_height, 100.0);
    }
}
