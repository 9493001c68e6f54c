//! # Probe Collection Demo
//!
//! End-to-end demonstration of the collection pipeline:
//!
//! 1. Four producer threads simulate probes scanning an overlapping set of
//!    files and packages, so most submissions are structural duplicates.
//! 2. Each producer filters out error items before submission, then issues
//!    a flush barrier so everything it collected is visible.
//! 3. The main thread prints cache metrics and a JSON report excerpt.
//!
//! ## Running
//!
//! ```bash
//! cargo run -p probe_collector --bin demo --release
//! ```

use itemcache::{Config, ItemCache, VecCollection};
use probe_collector::{
    to_json_string, CollectContext, Collected, Criterion, Filter, ItemStatus, ProbeItem,
};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::sync::Arc;
use std::thread;
use std::time::Instant;

const PRODUCERS: u64 = 4;
const ITEMS_PER_PRODUCER: u64 = 2_500;

const FILES: &[&str] = &[
    "/etc/passwd",
    "/etc/shadow",
    "/etc/ssh/sshd_config",
    "/etc/sudoers",
    "/var/log/audit/audit.log",
];

const PACKAGES: &[(&str, &str)] = &[
    ("openssl", "3.0.13"),
    ("zlib", "1.3.1"),
    ("bash", "5.2.21"),
    ("sudo", "1.9.15"),
];

fn generate_item(rng: &mut StdRng) -> ProbeItem {
    // ~5% of generated items simulate probe errors; filters drop them.
    if rng.gen_range(0..100) < 5 {
        return ProbeItem::new("file_item", ItemStatus::Error)
            .with_entry("message", "permission denied");
    }

    if rng.gen_bool(0.5) {
        let path = FILES[rng.gen_range(0..FILES.len())];
        ProbeItem::new("file_item", ItemStatus::Exists)
            .with_entry("path", path)
            .with_entry("owner", "root")
    } else {
        let (name, version) = PACKAGES[rng.gen_range(0..PACKAGES.len())];
        ProbeItem::new("package_item", ItemStatus::Exists)
            .with_entry("name", name)
            .with_entry("version", version)
    }
}

fn main() {
    tracing_subscriber::fmt::init();

    let cache = ItemCache::with_config(Config::new(8, true)).expect("cache start");
    let dest: Arc<VecCollection<ProbeItem>> = Arc::new(VecCollection::new());
    let started = Instant::now();

    thread::scope(|s| {
        for producer in 0..PRODUCERS {
            let cache = &cache;
            let dest = Arc::clone(&dest);
            s.spawn(move || {
                let filters = vec![Filter::exclude(vec![Criterion::Status(ItemStatus::Error)])];
                let ctx = CollectContext::new(cache, dest, filters);
                let mut rng = StdRng::seed_from_u64(producer);

                let mut filtered = 0u64;
                for _ in 0..ITEMS_PER_PRODUCER {
                    match ctx.collect(generate_item(&mut rng)) {
                        Ok(Collected::Accepted) => {}
                        Ok(Collected::Filtered) => filtered += 1,
                        Err(err) => {
                            tracing::error!(error = %err, producer, "collect failed");
                            return;
                        }
                    }
                }

                ctx.flush().expect("flush");
                tracing::info!(producer, filtered, "producer done");
            });
        }
    });

    let elapsed = started.elapsed();
    let metrics = cache.metrics();
    let collected = dest.snapshot();

    println!("== probe collection demo ==");
    println!("elapsed:                {elapsed:?}");
    println!("items submitted:        {}", metrics.items_submitted());
    println!("items processed:        {}", metrics.items_processed());
    println!("dedup hits:             {}", metrics.dedup_hits());
    println!("fingerprint collisions: {}", metrics.fingerprint_collisions());
    println!("flush barriers:         {}", metrics.flushes());
    println!("full-queue waits:       {}", metrics.full_waits());
    println!("collected references:   {}", collected.len());

    // The canonical set is tiny compared to the reference stream; print it.
    let mut canonicals: Vec<_> = collected.clone();
    canonicals.sort_by(|a, b| a.id.cmp(&b.id));
    canonicals.dedup_by(|a, b| Arc::ptr_eq(a, b));
    println!("canonical items:        {}", canonicals.len());

    match to_json_string(&canonicals) {
        Ok(json) => println!("{json}"),
        Err(err) => tracing::error!(error = %err, "report rendering failed"),
    }
}
