//! Deviation of a single free-rotor level from its ideal energy at a fixed
//! grid size.

use anyhow::{ Context, Result };
use qrotor::{ System, SystemConfig };
use tracing_subscriber::EnvFilter;

const E_LEVEL: usize = 5;
const GRIDSIZE: usize = 200_000;

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info")))
        .with_target(false)
        .init();

    let config = SystemConfig::new()
        .potential("zero", &[])
        .rotational_inertia(1.0)
        .energy_levels(10)
        .keep_eigenvectors(false)
        .gridsize(GRIDSIZE);
    let mut system = System::new(config)?;
    system.solve()?;
    println!("Eigenvalues: {:?}", system.get_eigenvalues());

    let ideal = system.ideal_eigenvalue(E_LEVEL);
    let real = *system.get_eigenvalues().get(E_LEVEL)
        .context("requested level was not computed")?;
    println!(
        "Deviation from ideal energy for eigenvalue #{} with a grid of size {}: {:e} meV",
        E_LEVEL, GRIDSIZE, (ideal - real).abs(),
    );
    Ok(())
}
