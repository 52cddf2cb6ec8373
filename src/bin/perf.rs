use log::{info, warn};
use rand::{prelude::random, rngs::StdRng, Rng, SeedableRng};
use simplelog::{ColorChoice, Config, LevelFilter, TermLogger, TerminalMode};
use structopt::StructOpt;

use std::time;

use rbindex::RbTree;

/// Command line options.
#[derive(Clone, StructOpt)]
pub struct Opt {
    #[structopt(long = "seed")]
    seed: Option<u64>,

    #[structopt(long = "loads", default_value = "1000000")] // default 1M
    loads: usize,

    #[structopt(long = "inserts", default_value = "0")]
    inserts: usize,

    #[structopt(long = "deletes", default_value = "0")]
    deletes: usize,

    #[structopt(long = "gets", default_value = "0")]
    gets: usize,

    #[structopt(long = "validate")]
    validate: bool,

    #[structopt(long = "log-level", default_value = "info")]
    log_level: LevelFilter,
}

fn main() {
    let opts = Opt::from_args();

    let config = Config::default();
    TermLogger::init(opts.log_level, config, TerminalMode::Mixed, ColorChoice::Auto).ok();

    let seed = opts.seed.unwrap_or_else(random);
    info!("perf seed {}", seed);
    let mut rng = StdRng::seed_from_u64(seed);

    let mut index: RbTree<u64> = RbTree::new();

    // initial load
    let start = time::Instant::now();
    let mut dups = 0;
    for _i in 0..opts.loads {
        if index.insert(rng.gen()).is_err() {
            dups += 1;
        }
    }
    info!(
        "loaded {} items ({} dups) in {:?}",
        index.len(),
        dups,
        start.elapsed()
    );

    do_incremental(&mut rng, &opts, &mut index);

    if opts.validate {
        let start = time::Instant::now();
        match index.validate() {
            Ok(()) => info!("validated {} items in {:?}", index.len(), start.elapsed()),
            Err(err) => warn!("validate failed {}", err),
        }
    }
}

fn do_incremental(rng: &mut StdRng, opts: &Opt, index: &mut RbTree<u64>) {
    let total = opts.inserts + opts.deletes + opts.gets;
    if total == 0 {
        return;
    }

    let (mut n_ins, mut n_del, mut n_get) = (0, 0, 0);
    let start = time::Instant::now();
    for _i in 0..total {
        let op = rng.gen::<usize>() % total;
        let key = rng.gen::<u64>();
        if op < opts.inserts {
            index.insert(key).ok();
            n_ins += 1;
        } else if op < (opts.inserts + opts.deletes) {
            index.delete(&key);
            n_del += 1;
        } else {
            index.get(&key).ok();
            n_get += 1;
        }
    }
    info!(
        "incremental ins:{} del:{} get:{}, took {:?}",
        n_ins,
        n_del,
        n_get,
        start.elapsed()
    );

    let (min, max) = (index.min().ok(), index.max().ok());
    info!("len:{} min:{:?} max:{:?}", index.len(), min, max);
}
