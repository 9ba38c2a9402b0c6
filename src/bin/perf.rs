use log::info;
use rand::{prelude::random, rngs::SmallRng, Rng, SeedableRng};
use simplelog::{ColorChoice, Config as LogConfig, LevelFilter, TermLogger, TerminalMode};
use structopt::StructOpt;

use std::time;

use redblack::{Config, Handle, Natural, RbTree, Substitute};

/// Command line options.
#[derive(Clone, StructOpt)]
pub struct Opt {
    #[structopt(long = "seed")]
    seed: Option<u64>,

    #[structopt(long = "loads", default_value = "1000000")] // default 1M
    loads: usize,

    #[structopt(long = "finds", default_value = "1000000")] // default 1M
    finds: usize,

    #[structopt(long = "removes", default_value = "500000")]
    removes: usize,

    #[structopt(long = "predecessor")]
    predecessor: bool,

    #[structopt(long = "log-level", default_value = "info")]
    log_level: LevelFilter,
}

fn main() {
    let opts = Opt::from_args();

    let mode = TerminalMode::Mixed;
    if let Err(err) = TermLogger::init(opts.log_level, LogConfig::default(), mode, ColorChoice::Auto)
    {
        eprintln!("logger: {}", err);
    }

    let seed = opts.seed.unwrap_or_else(random);
    info!("seed {}", seed);
    let mut rng = SmallRng::seed_from_u64(seed);

    let config = match opts.predecessor {
        true => Config::default().set_substitute(Substitute::Predecessor),
        false => Config::default(),
    };
    let mut index: RbTree<u64> = RbTree::with_config(Natural, config);

    // initial load
    let start = time::Instant::now();
    let mut handles: Vec<Handle> = Vec::with_capacity(opts.loads);
    for _i in 0..opts.loads {
        handles.push(index.add(rng.gen::<u64>() % 10_000_000));
    }
    info!("loaded {} items in {:?}", opts.loads, start.elapsed());

    let start = time::Instant::now();
    let mut n_found = 0;
    for _i in 0..opts.finds {
        if index.find(&(rng.gen::<u64>() % 10_000_000)).is_some() {
            n_found += 1;
        }
    }
    info!("found {}/{} items in {:?}", n_found, opts.finds, start.elapsed());

    let start = time::Instant::now();
    let mut n_removes = 0;
    for _i in 0..opts.removes {
        if handles.is_empty() {
            break;
        }
        let off = rng.gen::<usize>() % handles.len();
        match index.remove(handles.swap_remove(off)) {
            Ok(_) => n_removes += 1,
            Err(err) => panic!("remove: {}", err),
        }
    }
    info!("removed {} items in {:?}", n_removes, start.elapsed());

    let start = time::Instant::now();
    match index.validate() {
        Ok(stats) => info!("validated {:?} in {:?}", stats, start.elapsed()),
        Err(err) => panic!("validate: {}", err),
    }
}
