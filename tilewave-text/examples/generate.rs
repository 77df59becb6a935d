use rand::{Rng, SeedableRng};
use rand_xorshift::XorShiftRng;
use std::fs;
use tilewave_text::*;

fn generate<T: TextTile>(
    input: &str,
    config: &Config,
    parallel: bool,
    rng: &mut XorShiftRng,
) -> Result<String, GenerateTextError> {
    let text_patterns =
        TextPatterns::<T>::from_text(input, config.pattern_size, config.use_rotations)?;
    println!("{} patterns", text_patterns.catalog().len());
    let output = if parallel {
        #[cfg(feature = "parallel")]
        {
            text_patterns.generate_text_retrying(
                config.output_size,
                config.wrap,
                retry::ParNumTimes(config.retries),
                rng,
            )
        }
        #[cfg(not(feature = "parallel"))]
        panic!("Recompile with `--features=parallel` to enable parallel retry")
    } else {
        text_patterns.generate_text_retrying(
            config.output_size,
            config.wrap,
            retry::NumTimes(config.retries),
            rng,
        )
    };
    Ok(output.map_err(GenerateError::from)?)
}

fn app() -> Result<(), ()> {
    let (
        seed_opt,
        input_path,
        output_path,
        no_rotations,
        integers,
        pattern_size,
        width,
        height,
        retries,
        wrap,
        parallel,
    ) = meap::all! {
        opt_opt("INT", 's').name("seed").desc("rng seed"),
        opt_req::<String, _>("PATH", 'i').name("input").desc("input path"),
        opt_opt::<String, _>("PATH", 'o').name("output").desc("output path (default: stdout)"),
        flag("no-rotations").desc("don't add rotated copies of sample patterns"),
        flag("integers").desc("sample is whitespace-separated integers"),
        opt_opt::<u32, _>("INT", 'p').name("pattern-size").desc("size of patterns in tiles").with_default(2),
        opt_opt::<u32, _>("INT", 'x').name("width").desc("width").with_default(48),
        opt_opt::<u32, _>("INT", 'y').name("height").desc("height").with_default(48),
        opt_opt::<usize, _>("INT", 'r').name("retries").desc("number of retries").with_default(10),
        opt_opt::<String, _>("WRAP", 'w').name("wrap").desc("none, x, y or xy").with_default("none".to_string()),
        flag("parallel").desc("run multiple attempts in parallel"),
    }
    .with_help_default()
    .parse_env_or_exit();
    env_logger::init();
    let wrap = match wrap.parse::<OutputWrap>() {
        Ok(wrap) => wrap,
        Err(e) => {
            eprintln!("{}", e);
            return Err(());
        }
    };
    let seed = seed_opt.unwrap_or_else(|| rand::thread_rng().gen());
    println!("seed: {}", seed);
    let input = match fs::read_to_string(&input_path) {
        Ok(input) => input,
        Err(e) => {
            eprintln!("Failed to read {}: {}", input_path, e);
            return Err(());
        }
    };
    let config = Config::default()
        .with_pattern_size(pattern_size)
        .with_output_size(Size::new(width, height))
        .with_random_seed(seed)
        .with_rotations(!no_rotations)
        .with_wrap(wrap)
        .with_retries(retries);
    let mut rng = XorShiftRng::seed_from_u64(seed);
    let start_time = ::std::time::Instant::now();
    let result = if integers {
        generate::<i64>(&input, &config, parallel, &mut rng)
    } else {
        generate::<char>(&input, &config, parallel, &mut rng)
    };
    match result {
        Err(e) => {
            eprintln!("{}", e);
            Err(())
        }
        Ok(output) => {
            let end_time = ::std::time::Instant::now();
            println!("{:?}", end_time - start_time);
            match output_path {
                Some(output_path) => {
                    if let Err(e) = fs::write(&output_path, output) {
                        eprintln!("Failed to write {}: {}", output_path, e);
                        return Err(());
                    }
                }
                None => print!("{}", output),
            }
            Ok(())
        }
    }
}

fn main() {
    ::std::process::exit(match app() {
        Ok(()) => 0,
        Err(()) => 1,
    })
}
