//! Energy convergence of the free rotor as a function of grid size.

use std::{ fs, path::PathBuf };
use anyhow::Result;
use qrotor::{ systems, System, SystemConfig };
use tracing::info;
use tracing_subscriber::EnvFilter;

// degenerate levels come in pairs, so only every other one is reported
const E_LEVELS: usize = 15;
const GRIDSIZES: [usize; 12] = [
    100, 200, 500, 1_000, 5_000, 10_000, 20_000, 50_000, 100_000, 200_000,
    500_000, 1_000_000,
];

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info")))
        .with_target(false)
        .init();

    let mut data: Vec<System> = Vec::with_capacity(GRIDSIZES.len());
    for n in GRIDSIZES {
        let config = SystemConfig::new()
            .comment("free rotor convergence")
            .potential("zero", &[])
            .rotational_inertia(1.0)
            .energy_levels(E_LEVELS)
            .keep_eigenvectors(false)
            .gridsize(n);
        let mut system = System::new(config)?;
        system.solve()?;
        system.reduce_size();
        data.push(system);
    }
    systems::sort_by_gridsize(&mut data);

    let gridsizes = systems::get_gridsizes(&data);
    let runtimes: Vec<Option<f64>>
        = systems::get_runtimes(&data).into_iter()
        .map(|t| t.map(|t| t.as_secs_f64()))
        .collect();
    let errors = systems::convergence_errors(&data);

    print!("{:>9} {:>10}", "gridsize", "runtime/s");
    (1..E_LEVELS).step_by(2)
        .for_each(|i| print!(" {:>11}", format!("E{}", (i + 1) / 2)));
    println!();
    for ((n, t), errs) in gridsizes.iter().zip(&runtimes).zip(&errors) {
        print!("{:>9} {:>10.4}", n.unwrap_or(0), t.unwrap_or(f64::NAN));
        if let Some(errs) = errs {
            errs.iter().skip(1).step_by(2).for_each(|err| print!(" {:>11.3e}", err));
        }
        println!();
    }

    let outdir = PathBuf::from("output");
    fs::create_dir_all(&outdir)?;
    let outfile = outdir.join("convergence.json");
    let record = serde_json::json!({
        "gridsizes": gridsizes,
        "runtimes": runtimes,
        "errors": errors,
        "summaries": data.iter().map(|s| s.summary()).collect::<Vec<_>>(),
    });
    fs::write(&outfile, serde_json::to_string_pretty(&record)?)?;
    info!(path = %outfile.display(), "wrote convergence data");
    Ok(())
}
