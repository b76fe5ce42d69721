//! Bounded Queue
//!
//! Fluid FIFO buffer used as the congestion model. The aggregate rate is
//! offered as arriving load once per processed event, then a fixed service
//! quantum is drained. Load that does not fit is counted as dropped.

use crate::ss_error::SimError;

#[derive(Debug, Clone)]
pub struct BoundedQueue {
    capacity: f64,
    service_rate: f64,
    occupancy: f64,
    dropped: f64,
}

impl BoundedQueue {
    pub fn new(capacity: f64, service_rate: f64) -> Result<Self, SimError> {
        if !(capacity >= 0.0) || !capacity.is_finite() {
            return Err(SimError::invalid(
                "capacity",
                format!("must be finite and >= 0, got {}", capacity),
            ));
        }
        if !(service_rate >= 0.0) || !service_rate.is_finite() {
            return Err(SimError::invalid(
                "service_rate",
                format!("must be finite and >= 0, got {}", service_rate),
            ));
        }

        Ok(Self {
            capacity,
            service_rate,
            occupancy: 0.0,
            dropped: 0.0,
        })
    }

    /// Admit `arriving` units; whatever exceeds free space is dropped
    pub fn add_traffic(&mut self, arriving: f64) {
        let space = self.capacity - self.occupancy;
        if arriving <= space {
            self.occupancy += arriving;
        } else {
            self.occupancy = self.capacity;
            self.dropped += arriving - space;
        }
    }

    /// Drain one service quantum
    pub fn service(&mut self) {
        self.occupancy -= self.occupancy.min(self.service_rate);
    }

    pub fn occupancy(&self) -> f64 {
        self.occupancy
    }

    /// Cumulative dropped load, never decreases
    pub fn dropped(&self) -> f64 {
        self.dropped
    }

    pub fn capacity(&self) -> f64 {
        self.capacity
    }

    pub fn service_rate(&self) -> f64 {
        self.service_rate
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_overflow_is_dropped() {
        let mut q = BoundedQueue::new(10.0, 3.0).unwrap();
        q.add_traffic(8.0);
        assert_eq!(q.occupancy(), 8.0);
        assert_eq!(q.dropped(), 0.0);

        q.add_traffic(5.0);
        assert_eq!(q.occupancy(), 10.0);
        assert_eq!(q.dropped(), 3.0);
    }

    #[test]
    fn test_service_drains_fixed_quantum() {
        let mut q = BoundedQueue::new(10.0, 3.0).unwrap();
        q.add_traffic(8.0);
        q.service();
        assert_eq!(q.occupancy(), 5.0);
    }

    #[test]
    fn test_service_never_goes_negative() {
        let mut q = BoundedQueue::new(10.0, 3.0).unwrap();
        q.add_traffic(4.0);
        for _ in 0..10 {
            q.service();
            assert!(q.occupancy() >= 0.0);
        }
        assert_eq!(q.occupancy(), 0.0);
    }

    #[test]
    fn test_dropped_is_cumulative() {
        let mut q = BoundedQueue::new(2.0, 0.0).unwrap();
        q.add_traffic(5.0);
        q.add_traffic(1.0);
        assert_eq!(q.dropped(), 4.0);
        assert_eq!(q.occupancy(), 2.0);
    }

    #[test]
    fn test_rejects_negative_configuration() {
        assert!(BoundedQueue::new(-1.0, 1.0).is_err());
        assert!(BoundedQueue::new(1.0, -1.0).is_err());
        assert!(BoundedQueue::new(f64::INFINITY, 1.0).is_err());
    }
}
