/// Configuration for the cache work queue.
#[derive(Debug, Clone, Copy)]
pub struct Config {
    /// Work queue capacity as power of 2 (default: 7 = 128 entries)
    pub queue_bits: u8,
    /// Enable metrics collection (slight overhead)
    pub enable_metrics: bool,
}

impl Config {
    /// Creates a new configuration with custom settings.
    ///
    /// # Panics
    ///
    /// Panics if `queue_bits` is 0 or greater than 16 (64K entries max) to
    /// prevent excessive memory usage for queued work.
    pub const fn new(queue_bits: u8, enable_metrics: bool) -> Self {
        assert!(
            queue_bits > 0 && queue_bits <= 16,
            "queue_bits must be between 1 and 16 (max 64K entries)"
        );

        Self {
            queue_bits,
            enable_metrics,
        }
    }

    /// Returns the capacity of the work queue.
    #[inline]
    pub const fn capacity(&self) -> usize {
        1 << self.queue_bits
    }

    /// Returns the mask for index wrapping.
    #[inline]
    pub const fn mask(&self) -> u64 {
        (self.capacity() - 1) as u64
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            queue_bits: 7, // 128 entries
            enable_metrics: true,
        }
    }
}

/// Small footprint configuration (16 entries, no metrics)
pub const SMALL_FOOTPRINT_CONFIG: Config = Config::new(4, false);

/// High throughput configuration (1K entries, metrics enabled)
pub const HIGH_THROUGHPUT_CONFIG: Config = Config::new(10, true);
