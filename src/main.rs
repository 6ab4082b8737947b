use entangle::protocols::{prepare_bell, send_superdense, teleport_qubit};
use entangle::{gates, QuantumSystem, SimConfig};
use tracing_subscriber::EnvFilter;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_target(false)
        .init();

    let args: Vec<String> = std::env::args().collect();
    let config = SimConfig::from_env();

    let outcome = match args.get(1).map(String::as_str) {
        None | Some("demo") => run_all_demos(&config),
        Some("bell") => demo_bell_sampling(&config, parse_trials(args.get(2))),
        Some("superdense") => demo_superdense(&config),
        Some("teleport") => demo_teleport(&config),
        Some("help") | Some("--help") => {
            print_help();
            Ok(())
        }
        Some(unknown) => {
            eprintln!("Unknown command '{unknown}'. Run 'entangle help' for usage.");
            std::process::exit(1);
        }
    };

    if let Err(e) = outcome {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}

fn parse_trials(arg: Option<&String>) -> usize {
    arg.and_then(|s| s.parse().ok()).unwrap_or(10_000)
}

fn print_help() {
    println!("Usage: entangle [COMMAND] [ARGS]\n");
    println!("Commands:");
    println!("  demo              Run every demonstration (default)");
    println!("  bell [trials]     Sample Bell pairs and tally outcome pairs");
    println!("  superdense        Send all four bit pairs by superdense coding");
    println!("  teleport          Teleport 0.6|0⟩ + 0.8|1⟩ from C to B via A");
    println!("  help              Show this message\n");
    println!("Environment:");
    println!("  ENTANGLE_SEED              Fix the measurement seed");
    println!("  ENTANGLE_MAX_GROUP_QUBITS  Largest allowed qubit group");
    println!("  RUST_LOG                   Log filter (e.g. entangle=debug)");
}

fn run_all_demos(config: &SimConfig) -> entangle::Result<()> {
    demo_cnot(config)?;
    demo_bell_sampling(config, 10_000)?;
    demo_superdense(config)?;
    demo_teleport(config)
}

fn demo_cnot(config: &SimConfig) -> entangle::Result<()> {
    println!("━━━ CNOT on 0.6|0⟩+0.8|1⟩ ⊗ 0.8|0⟩+0.6|1⟩ ━━━━━━━━━━━━");
    let mut sys = QuantumSystem::with_config(config.clone());
    sys.create_qubit("A", 0.6, 0.8)?;
    sys.create_qubit("B", 0.8, 0.6)?;
    sys.apply_gate(&gates::controlled_not(), &["A", "B"])?;
    print!("{}", sys.group_of("A")?);
    let a = sys.measure_qubit("A")?;
    let b = sys.measure_qubit("B")?;
    println!("Measured A={a} B={b}\n");
    Ok(())
}

fn demo_bell_sampling(config: &SimConfig, trials: usize) -> entangle::Result<()> {
    println!("━━━ Bell pairs: {trials} trials per selector ━━━━━━━━━━━━━━━━");
    let mut sys = QuantumSystem::with_config(config.clone());
    for selector in 0..4u8 {
        let mut counts = [0usize; 4];
        for _ in 0..trials {
            sys.clear();
            prepare_bell(&mut sys, "A", "B", selector)?;
            let a = sys.measure_qubit("A")?;
            let b = sys.measure_qubit("B")?;
            counts[usize::from(a << 1 | b)] += 1;
        }
        println!(
            "  selector {selector}:  00={}  01={}  10={}  11={}",
            counts[0], counts[1], counts[2], counts[3]
        );
    }
    println!();
    Ok(())
}

fn demo_superdense(config: &SimConfig) -> entangle::Result<()> {
    println!("━━━ Superdense coding ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
    let mut sys = QuantumSystem::with_config(config.clone());
    for (a1, a2) in [(0, 0), (0, 1), (1, 0), (1, 1)] {
        sys.clear();
        let (b1, b2) = send_superdense(&mut sys, a1, a2, "A", "B")?;
        let status = if (a1, a2) == (b1, b2) { "ok" } else { "MISMATCH" };
        println!("  sent {a1}{a2}  received {b1}{b2}  {status}");
    }
    println!();
    Ok(())
}

fn demo_teleport(config: &SimConfig) -> entangle::Result<()> {
    println!("━━━ Teleportation ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
    let mut sys = QuantumSystem::with_config(config.clone());
    sys.create_qubit("C", 0.6, 0.8)?;
    print!("Before: {}", sys.group_of("C")?);
    let (b1, b2) = teleport_qubit(&mut sys, "C", "A", "B")?;
    println!("Classical bits sent: {b1}{b2}");
    print!("After:  {}", sys.group_of("B")?);
    println!();
    Ok(())
}
