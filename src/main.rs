use anyhow::{anyhow, bail, Context, Result};
use clap::{arg, Command};
use par_anneal::sa::{
    AcceptanceBaseline, CoolingLaw, ParallelConfig, ParallelSaRunner, SaConfig, SaRunner,
};
use par_anneal::scheduling::{
    generate_jobs, load_jobs, write_jobs, SchedulingMutation, SchedulingSolution,
};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::PathBuf;
use std::time::Instant;

fn cli() -> Command {
    Command::new("par-anneal")
        .about("Balances job schedules across identical processors with parallel simulated annealing")
        .arg_required_else_help(true)
        .subcommand(
            Command::new("solve")
                .about("Anneals a schedule for a job list")
                .arg(
                    arg!(<JOBS_CSV> "Path to a job list CSV (Job ID,Duration)")
                        .value_parser(clap::value_parser!(PathBuf)),
                )
                .arg(
                    arg!(--processors <NUM> "Number of identical processors")
                        .value_parser(clap::value_parser!(usize)),
                )
                .arg(
                    arg!(--workers [NUM] "Annealing workers forked each round")
                        .default_value("4")
                        .value_parser(clap::value_parser!(usize)),
                )
                .arg(
                    arg!(--cooling [LAW] "Cooling law: boltzmann, cauchy or log-cauchy")
                        .default_value("boltzmann")
                        .value_parser(clap::value_parser!(String)),
                )
                .arg(
                    arg!(--"initial-temp" [TEMP] "Initial temperature")
                        .default_value("100.0")
                        .value_parser(clap::value_parser!(f64)),
                )
                .arg(
                    arg!(--stagnation [NUM] "Stagnant iterations before a worker stops")
                        .default_value("100")
                        .value_parser(clap::value_parser!(usize)),
                )
                .arg(
                    arg!(--rounds [NUM] "Stagnant rounds before the search stops")
                        .default_value("10")
                        .value_parser(clap::value_parser!(usize)),
                )
                .arg(
                    arg!(--"worker-iterations" [NUM] "Fixed per-worker iteration allowance")
                        .value_parser(clap::value_parser!(usize)),
                )
                .arg(arg!(--"two-state" "Judge candidates against the current solution instead of the best"))
                .arg(
                    arg!(--seed [SEED] "Seed for a reproducible run")
                        .value_parser(clap::value_parser!(u64)),
                )
                .arg(arg!(--"show-loads" "Print per-processor loads of the final schedule")),
        )
        .subcommand(
            Command::new("generate")
                .about("Generates a random job list CSV")
                .arg(arg!(<OUTPUT> "Output CSV path").value_parser(clap::value_parser!(PathBuf)))
                .arg(
                    arg!(--jobs <NUM> "Number of jobs")
                        .value_parser(clap::value_parser!(usize)),
                )
                .arg(
                    arg!(--min [DURATION] "Minimum job duration")
                        .default_value("1")
                        .value_parser(clap::value_parser!(u32)),
                )
                .arg(
                    arg!(--max [DURATION] "Maximum job duration")
                        .default_value("100")
                        .value_parser(clap::value_parser!(u32)),
                )
                .arg(
                    arg!(--seed [SEED] "Seed for a reproducible job list")
                        .value_parser(clap::value_parser!(u64)),
                ),
        )
        .subcommand(
            Command::new("heatmap")
                .about("Times single annealing runs over a grid of instance sizes")
                .arg(
                    arg!(--output [CSV] "Output CSV path")
                        .default_value("heatmap_data.csv")
                        .value_parser(clap::value_parser!(PathBuf)),
                )
                .arg(
                    arg!(--jobs [LIST] "Comma-separated job counts")
                        .default_value("4000,16000,64000,128000,256000")
                        .value_parser(clap::value_parser!(String)),
                )
                .arg(
                    arg!(--processors [LIST] "Comma-separated processor counts")
                        .default_value("10,40,160,640")
                        .value_parser(clap::value_parser!(String)),
                )
                .arg(
                    arg!(--runs [NUM] "Runs averaged per grid cell")
                        .default_value("5")
                        .value_parser(clap::value_parser!(usize)),
                )
                .arg(
                    arg!(--"initial-temp" [TEMP] "Initial temperature")
                        .default_value("1000.0")
                        .value_parser(clap::value_parser!(f64)),
                )
                .arg(
                    arg!(--budget [NUM] "Per-run iteration allowance")
                        .default_value("1000")
                        .value_parser(clap::value_parser!(usize)),
                )
                .arg(
                    arg!(--seed [SEED] "Base seed")
                        .default_value("42")
                        .value_parser(clap::value_parser!(u64)),
                ),
        )
        .subcommand(
            Command::new("compare")
                .about("Compares solution quality and run time across cooling laws")
                .arg(
                    arg!(<JOBS_CSV> "Path to a job list CSV (Job ID,Duration)")
                        .value_parser(clap::value_parser!(PathBuf)),
                )
                .arg(
                    arg!(--processors <NUM> "Number of identical processors")
                        .value_parser(clap::value_parser!(usize)),
                )
                .arg(
                    arg!(--runs [NUM] "Runs averaged per law")
                        .default_value("5")
                        .value_parser(clap::value_parser!(usize)),
                )
                .arg(
                    arg!(--"initial-temp" [TEMP] "Initial temperature")
                        .default_value("1000.0")
                        .value_parser(clap::value_parser!(f64)),
                )
                .arg(
                    arg!(--budget [NUM] "Per-run iteration allowance")
                        .default_value("20000")
                        .value_parser(clap::value_parser!(usize)),
                )
                .arg(
                    arg!(--seed [SEED] "Base seed")
                        .default_value("42")
                        .value_parser(clap::value_parser!(u64)),
                ),
        )
        .subcommand(
            Command::new("scaling")
                .about("Measures speedup and efficiency across worker counts")
                .arg(
                    arg!(--output [CSV] "Output CSV path")
                        .default_value("parallel_scaling.csv")
                        .value_parser(clap::value_parser!(PathBuf)),
                )
                .arg(
                    arg!(--jobs [NUM] "Number of generated jobs")
                        .default_value("500")
                        .value_parser(clap::value_parser!(usize)),
                )
                .arg(
                    arg!(--processors [NUM] "Number of identical processors")
                        .default_value("32")
                        .value_parser(clap::value_parser!(usize)),
                )
                .arg(
                    arg!(--threads [LIST] "Comma-separated worker counts")
                        .default_value("1,2,4,8")
                        .value_parser(clap::value_parser!(String)),
                )
                .arg(
                    arg!(--runs [NUM] "Runs averaged per worker count")
                        .default_value("3")
                        .value_parser(clap::value_parser!(usize)),
                )
                .arg(
                    arg!(--budget [NUM] "Round iteration budget split across workers")
                        .default_value("1000")
                        .value_parser(clap::value_parser!(usize)),
                )
                .arg(
                    arg!(--seed [SEED] "Base seed")
                        .default_value("42")
                        .value_parser(clap::value_parser!(u64)),
                ),
        )
}

fn main() {
    let matches = cli().get_matches();

    if let Err(e) = match matches.subcommand() {
        Some(("solve", sub_m)) => solve(
            sub_m.get_one::<PathBuf>("JOBS_CSV").unwrap().clone(),
            *sub_m.get_one::<usize>("processors").unwrap(),
            *sub_m.get_one::<usize>("workers").unwrap(),
            sub_m.get_one::<String>("cooling").unwrap().clone(),
            *sub_m.get_one::<f64>("initial-temp").unwrap(),
            *sub_m.get_one::<usize>("stagnation").unwrap(),
            *sub_m.get_one::<usize>("rounds").unwrap(),
            sub_m.get_one::<usize>("worker-iterations").copied(),
            sub_m.get_flag("two-state"),
            sub_m.get_one::<u64>("seed").copied(),
            sub_m.get_flag("show-loads"),
        ),
        Some(("generate", sub_m)) => generate(
            sub_m.get_one::<PathBuf>("OUTPUT").unwrap().clone(),
            *sub_m.get_one::<usize>("jobs").unwrap(),
            *sub_m.get_one::<u32>("min").unwrap(),
            *sub_m.get_one::<u32>("max").unwrap(),
            sub_m.get_one::<u64>("seed").copied(),
        ),
        Some(("heatmap", sub_m)) => heatmap(
            sub_m.get_one::<PathBuf>("output").unwrap().clone(),
            sub_m.get_one::<String>("jobs").unwrap().clone(),
            sub_m.get_one::<String>("processors").unwrap().clone(),
            *sub_m.get_one::<usize>("runs").unwrap(),
            *sub_m.get_one::<f64>("initial-temp").unwrap(),
            *sub_m.get_one::<usize>("budget").unwrap(),
            *sub_m.get_one::<u64>("seed").unwrap(),
        ),
        Some(("compare", sub_m)) => compare(
            sub_m.get_one::<PathBuf>("JOBS_CSV").unwrap().clone(),
            *sub_m.get_one::<usize>("processors").unwrap(),
            *sub_m.get_one::<usize>("runs").unwrap(),
            *sub_m.get_one::<f64>("initial-temp").unwrap(),
            *sub_m.get_one::<usize>("budget").unwrap(),
            *sub_m.get_one::<u64>("seed").unwrap(),
        ),
        Some(("scaling", sub_m)) => scaling(
            sub_m.get_one::<PathBuf>("output").unwrap().clone(),
            *sub_m.get_one::<usize>("jobs").unwrap(),
            *sub_m.get_one::<usize>("processors").unwrap(),
            sub_m.get_one::<String>("threads").unwrap().clone(),
            *sub_m.get_one::<usize>("runs").unwrap(),
            *sub_m.get_one::<usize>("budget").unwrap(),
            *sub_m.get_one::<u64>("seed").unwrap(),
        ),
        _ => Err(anyhow!("Invalid subcommand")),
    } {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn parse_cooling(name: &str, initial: f64) -> Result<CoolingLaw> {
    match name {
        "boltzmann" => Ok(CoolingLaw::Boltzmann { initial }),
        "cauchy" => Ok(CoolingLaw::Cauchy { initial }),
        "log-cauchy" => Ok(CoolingLaw::LogCauchy { initial }),
        other => Err(anyhow!(
            "unknown cooling law {other:?} (expected boltzmann, cauchy or log-cauchy)"
        )),
    }
}

fn parse_list(text: &str) -> Result<Vec<usize>> {
    text.split(',')
        .map(|part| {
            part.trim()
                .parse::<usize>()
                .map_err(|_| anyhow!("invalid list entry {part:?}"))
        })
        .collect()
}

fn solve(
    jobs_csv: PathBuf,
    processors: usize,
    workers: usize,
    cooling: String,
    initial_temp: f64,
    stagnation: usize,
    rounds: usize,
    worker_iterations: Option<usize>,
    two_state: bool,
    seed: Option<u64>,
    show_loads: bool,
) -> Result<()> {
    let cooling = parse_cooling(&cooling, initial_temp)?;
    let durations = load_jobs(&jobs_csv)?;
    let num_jobs = durations.len();

    let seed = seed.unwrap_or_else(rand::random);
    let mut rng = StdRng::seed_from_u64(seed);
    let initial = SchedulingSolution::new(durations, processors, &mut rng).map_err(|e| anyhow!(e))?;

    let mut config = ParallelConfig::default()
        .with_num_workers(workers)
        .with_cooling(cooling)
        .with_stagnation_limit(stagnation)
        .with_max_stagnant_rounds(rounds)
        .with_seed(seed);
    if let Some(allowance) = worker_iterations {
        config = config.with_worker_iterations(allowance);
    }
    if two_state {
        config = config.with_baseline(AcceptanceBaseline::Current);
    }
    config.validate().map_err(|e| anyhow!(e))?;

    println!("{num_jobs} jobs on {processors} processors, {workers} workers, seed {seed}");
    println!("initial spread: {}", initial.spread());

    let start = Instant::now();
    let result = ParallelSaRunner::run_with_observer(
        initial,
        &SchedulingMutation,
        &config,
        |round, cost| println!("round {round:>3}: best spread {cost}"),
    );
    let elapsed = start.elapsed();

    println!(
        "best spread {} after {} rounds, {} iterations, {:.3}s",
        result.best_cost,
        result.rounds,
        result.total_iterations,
        elapsed.as_secs_f64()
    );
    if show_loads {
        for (processor, load) in result.best.loads().iter().enumerate() {
            println!("  processor {processor}: {load}");
        }
    }
    Ok(())
}

fn generate(output: PathBuf, jobs: usize, min: u32, max: u32, seed: Option<u64>) -> Result<()> {
    if jobs == 0 {
        bail!("at least one job is required");
    }
    if min > max {
        bail!("minimum duration {min} exceeds maximum {max}");
    }

    let mut rng = match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::seed_from_u64(rand::random()),
    };
    let durations = generate_jobs(jobs, min, max, &mut rng);
    write_jobs(&output, &durations)?;

    println!("wrote {jobs} jobs to {}", output.display());
    Ok(())
}

fn heatmap(
    output: PathBuf,
    jobs_list: String,
    processors_list: String,
    runs: usize,
    initial_temp: f64,
    budget: usize,
    seed: u64,
) -> Result<()> {
    let jobs_list = parse_list(&jobs_list)?;
    let processors_list = parse_list(&processors_list)?;
    if runs == 0 {
        bail!("at least one run per grid cell is required");
    }

    let file =
        File::create(&output).with_context(|| format!("cannot create {}", output.display()))?;
    let mut writer = BufWriter::new(file);
    writeln!(writer, "Jobs,Processors,Time")?;

    for &jobs in &jobs_list {
        for &processors in &processors_list {
            let mut total_time = 0.0;
            for run in 0..runs {
                let run_seed = seed + run as u64;
                let mut rng = StdRng::seed_from_u64(run_seed);
                let durations = generate_jobs(jobs, 1, 100, &mut rng);
                let initial = SchedulingSolution::new(durations, processors, &mut rng)
                    .map_err(|e| anyhow!(e))?;
                // Budget-bound runs: at this temperature the stagnation
                // rule alone can go unmet indefinitely, and the cells
                // only compare when every run gets the same allowance.
                let config = SaConfig::bounded(budget)
                    .with_cooling(CoolingLaw::Boltzmann {
                        initial: initial_temp,
                    })
                    .with_seed(run_seed);
                config.validate().map_err(|e| anyhow!(e))?;

                let start = Instant::now();
                SaRunner::run(initial, &SchedulingMutation, &config);
                total_time += start.elapsed().as_secs_f64();
            }
            let avg_time = total_time / runs as f64;
            writeln!(writer, "{jobs},{processors},{avg_time}")?;
            println!("jobs {jobs}, processors {processors}: avg {avg_time:.3}s");
        }
    }

    writer.flush()?;
    println!("wrote heatmap data to {}", output.display());
    Ok(())
}

fn compare(
    jobs_csv: PathBuf,
    processors: usize,
    runs: usize,
    initial_temp: f64,
    budget: usize,
    seed: u64,
) -> Result<()> {
    if runs == 0 {
        bail!("at least one run per law is required");
    }
    let durations = load_jobs(&jobs_csv)?;
    println!(
        "{} jobs on {processors} processors, {runs} runs per law, allowance {budget}",
        durations.len()
    );

    let laws = [
        (
            "Boltzmann",
            CoolingLaw::Boltzmann {
                initial: initial_temp,
            },
        ),
        (
            "Cauchy",
            CoolingLaw::Cauchy {
                initial: initial_temp,
            },
        ),
        (
            "Log-Cauchy",
            CoolingLaw::LogCauchy {
                initial: initial_temp,
            },
        ),
    ];

    for (name, law) in laws {
        let mut total_cost = 0.0;
        let mut total_time = 0.0;
        for run in 0..runs {
            let run_seed = seed + run as u64;
            let mut rng = StdRng::seed_from_u64(run_seed);
            let initial = SchedulingSolution::new(durations.clone(), processors, &mut rng)
                .map_err(|e| anyhow!(e))?;
            // Equal allowances keep the laws comparable; the slowest
            // cooling law would otherwise never stop accepting.
            let config = SaConfig::bounded(budget).with_cooling(law).with_seed(run_seed);
            config.validate().map_err(|e| anyhow!(e))?;

            let start = Instant::now();
            let result = SaRunner::run(initial, &SchedulingMutation, &config);
            total_time += start.elapsed().as_secs_f64();
            total_cost += result.best_cost;
        }
        println!("{name}:");
        println!("  average spread: {}", total_cost / runs as f64);
        println!("  average time:   {:.3}s", total_time / runs as f64);
    }
    Ok(())
}

struct ScalingSummary {
    best_workers: usize,
    best_speedup: f64,
    saturation_workers: usize,
    recommended_workers: usize,
}

/// Reduces measured `(workers, speedup, efficiency)` rows, baseline
/// first, to the count with the best observed speedup and the
/// saturation point (first count past the baseline whose efficiency
/// drops below 0.7, or the largest measured count when none does).
/// The recommendation is the smaller of the two.
fn summarize_scaling(rows: &[(usize, f64, f64)]) -> ScalingSummary {
    let (mut best_workers, mut best_speedup, _) = rows[0];
    for &(workers, speedup, _) in &rows[1..] {
        if speedup > best_speedup {
            best_speedup = speedup;
            best_workers = workers;
        }
    }

    // The baseline row is skipped: its efficiency is 1 / workers by
    // construction, not a saturation signal.
    let saturation_workers = rows[1..]
        .iter()
        .find(|row| row.2 < 0.7)
        .map_or(rows[rows.len() - 1].0, |row| row.0);

    ScalingSummary {
        best_workers,
        best_speedup,
        saturation_workers,
        recommended_workers: best_workers.min(saturation_workers),
    }
}

fn scaling(
    output: PathBuf,
    jobs: usize,
    processors: usize,
    threads_list: String,
    runs: usize,
    budget: usize,
    seed: u64,
) -> Result<()> {
    let threads_list = parse_list(&threads_list)?;
    if runs == 0 {
        bail!("at least one run per worker count is required");
    }
    if threads_list.iter().any(|&threads| threads == 0) {
        bail!("worker counts must be at least 1");
    }

    let mut gen_rng = StdRng::seed_from_u64(seed);
    let durations = generate_jobs(jobs, 1, 100, &mut gen_rng);

    let file =
        File::create(&output).with_context(|| format!("cannot create {}", output.display()))?;
    let mut writer = BufWriter::new(file);
    writeln!(writer, "Threads,Time,Cost,Speedup,Efficiency")?;

    println!("{jobs} jobs on {processors} processors, round budget {budget} iterations");

    let mut baseline_time = 0.0;
    let mut rows = Vec::with_capacity(threads_list.len());
    for (index, &threads) in threads_list.iter().enumerate() {
        // Split the round budget across workers so every worker count
        // does comparable total work per round.
        let allowance = (budget / threads).max(100);

        let mut total_time = 0.0;
        let mut total_cost = 0.0;
        for run in 0..runs {
            let run_seed = seed + run as u64;
            let mut rng = StdRng::seed_from_u64(run_seed);
            let initial = SchedulingSolution::new(durations.clone(), processors, &mut rng)
                .map_err(|e| anyhow!(e))?;
            let config = ParallelConfig::default()
                .with_num_workers(threads)
                .with_worker_iterations(allowance)
                .with_seed(run_seed);
            config.validate().map_err(|e| anyhow!(e))?;

            let start = Instant::now();
            let result = ParallelSaRunner::run(initial, &SchedulingMutation, &config);
            total_time += start.elapsed().as_secs_f64();
            total_cost += result.best_cost;
        }
        let avg_time = total_time / runs as f64;
        let avg_cost = total_cost / runs as f64;
        if index == 0 {
            baseline_time = avg_time;
        }
        let speedup = baseline_time / avg_time;
        let efficiency = speedup / threads as f64;

        writeln!(
            writer,
            "{threads},{avg_time},{avg_cost},{speedup},{efficiency}"
        )?;
        println!(
            "workers {threads}: avg {avg_time:.3}s, spread {avg_cost}, speedup {speedup:.2}x, efficiency {:.0}%",
            efficiency * 100.0
        );
        rows.push((threads, speedup, efficiency));
    }

    writer.flush()?;

    let summary = summarize_scaling(&rows);
    println!(
        "best speedup: {:.2}x at {} workers",
        summary.best_speedup, summary.best_workers
    );
    println!("saturation point: {} workers", summary.saturation_workers);
    println!("recommended workers: {}", summary.recommended_workers);
    println!("wrote scaling data to {}", output.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_cooling_known_laws() {
        assert_eq!(
            parse_cooling("boltzmann", 5.0).unwrap(),
            CoolingLaw::Boltzmann { initial: 5.0 }
        );
        assert_eq!(
            parse_cooling("cauchy", 5.0).unwrap(),
            CoolingLaw::Cauchy { initial: 5.0 }
        );
        assert_eq!(
            parse_cooling("log-cauchy", 5.0).unwrap(),
            CoolingLaw::LogCauchy { initial: 5.0 }
        );
    }

    #[test]
    fn test_parse_cooling_rejects_unknown_law() {
        assert!(parse_cooling("linear", 5.0).is_err());
    }

    #[test]
    fn test_parse_list_splits_and_trims() {
        assert_eq!(parse_list("1, 2,8").unwrap(), vec![1, 2, 8]);
    }

    #[test]
    fn test_parse_list_rejects_garbage() {
        assert!(parse_list("1,two").is_err());
        assert!(parse_list("").is_err());
    }

    #[test]
    fn test_scaling_summary_caps_at_saturation() {
        // Speedup keeps climbing but efficiency falls under 0.7 at 4
        // workers, so the recommendation stops there.
        let rows = [(1, 1.0, 1.0), (2, 1.9, 0.95), (4, 2.6, 0.65), (8, 4.0, 0.5)];

        let summary = summarize_scaling(&rows);

        assert_eq!(summary.best_workers, 8);
        assert_eq!(summary.saturation_workers, 4);
        assert_eq!(summary.recommended_workers, 4);
    }

    #[test]
    fn test_scaling_summary_picks_peak_speedup() {
        // Speedup regresses past 4 workers; the peak count wins even
        // though saturation is only flagged later.
        let rows = [(1, 1.0, 1.0), (2, 1.8, 0.9), (4, 3.0, 0.75), (8, 2.5, 0.31)];

        let summary = summarize_scaling(&rows);

        assert_eq!(summary.best_workers, 4);
        assert_eq!(summary.best_speedup, 3.0);
        assert_eq!(summary.saturation_workers, 8);
        assert_eq!(summary.recommended_workers, 4);
    }

    #[test]
    fn test_scaling_summary_without_saturation() {
        // Nothing dips under 0.7, so the largest measured count bounds
        // the recommendation.
        let rows = [(1, 1.0, 1.0), (2, 1.9, 0.95), (4, 3.6, 0.9)];

        let summary = summarize_scaling(&rows);

        assert_eq!(summary.best_workers, 4);
        assert_eq!(summary.saturation_workers, 4);
        assert_eq!(summary.recommended_workers, 4);
    }
}
