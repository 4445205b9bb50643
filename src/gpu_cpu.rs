//! Host emulation of the seed search kernel.
//!
//! Evaluates a batch across `lanes` scoped threads, each lane scanning a
//! contiguous slice in ascending order. Lanes reduce with `fetch_min`, so
//! the reported seed is the lowest match in the batch.

use std::sync::atomic::{AtomicU64, Ordering};
use std::thread;

use crate::batch::BatchDevice;
use crate::search::SearchTarget;
use crate::GscError;

const NO_MATCH: u64 = u64::MAX;

pub struct HostDevice {
    lanes: usize,
    target: Option<SearchTarget>,
    found: bool,
    seed: u64,
}

impl HostDevice {
    pub fn new(lanes: usize) -> Self {
        Self {
            lanes: lanes.max(1),
            target: None,
            found: false,
            seed: 0,
        }
    }
}

impl Default for HostDevice {
    fn default() -> Self {
        Self::new(
            std::thread::available_parallelism()
                .map(|n| n.get())
                .unwrap_or(1),
        )
    }
}

fn scan_lane(target: &SearchTarget, first: u64, len: u64, best: &AtomicU64) {
    for i in 0..len {
        let seed = first + i;
        if best.load(Ordering::Relaxed) < seed {
            return;
        }
        if target.matches(seed) {
            best.fetch_min(seed, Ordering::Relaxed);
            return;
        }
    }
}

impl BatchDevice for HostDevice {
    fn name(&self) -> &str {
        "host"
    }

    fn load_target(&mut self, target: &SearchTarget) -> Result<(), GscError> {
        self.target = Some(target.clone());
        Ok(())
    }

    fn reset_found(&mut self) -> Result<(), GscError> {
        self.found = false;
        Ok(())
    }

    fn dispatch(&mut self, start_seed: u64, count: u64) -> Result<(), GscError> {
        let target = self
            .target
            .as_ref()
            .ok_or_else(|| GscError::Device("dispatch before load_target".into()))?;
        if count == 0 {
            return Ok(());
        }
        let last = start_seed
            .checked_add(count - 1)
            .ok_or_else(|| GscError::Device("batch runs past the seed space".into()))?;
        let best = AtomicU64::new(NO_MATCH);
        let per_lane = count.div_ceil(self.lanes as u64);
        thread::scope(|s| {
            let mut first = start_seed;
            loop {
                let len = per_lane.min(last - first + 1);
                let best = &best;
                s.spawn(move || scan_lane(target, first, len, best));
                match first.checked_add(len) {
                    Some(next) if next <= last => first = next,
                    _ => break,
                }
            }
        });
        let winner = best.into_inner();
        // u64::MAX doubles as the sentinel, so check it explicitly
        if winner != NO_MATCH || (last == u64::MAX && target.matches(u64::MAX)) {
            self.found = true;
            self.seed = winner;
        }
        Ok(())
    }

    fn read_found(&mut self) -> Result<bool, GscError> {
        Ok(self.found)
    }

    fn read_seed(&mut self) -> Result<u64, GscError> {
        Ok(self.seed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reports_lowest_match_in_batch() {
        // 0xce: seeds 25 and 42 are the first two producers
        let mut dev = HostDevice::new(4);
        dev.load_target(&SearchTarget::from_bytes(&[0xce])).unwrap();
        dev.reset_found().unwrap();
        dev.dispatch(0, 64).unwrap();
        assert!(dev.read_found().unwrap());
        assert_eq!(dev.read_seed().unwrap(), 25);

        dev.reset_found().unwrap();
        dev.dispatch(26, 20).unwrap();
        assert!(dev.read_found().unwrap());
        assert_eq!(dev.read_seed().unwrap(), 42);
    }

    #[test]
    fn miss_leaves_flag_clear() {
        let mut dev = HostDevice::new(3);
        dev.load_target(&SearchTarget::from_bytes(&[0xce])).unwrap();
        dev.reset_found().unwrap();
        dev.dispatch(0, 25).unwrap();
        assert!(!dev.read_found().unwrap());
    }

    #[test]
    fn dispatch_without_target_fails() {
        let mut dev = HostDevice::new(1);
        assert!(matches!(dev.dispatch(0, 1), Err(GscError::Device(_))));
    }
}
