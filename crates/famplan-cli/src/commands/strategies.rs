use famplan_core::StrategyKind;

pub fn run() -> Result<(), Box<dyn std::error::Error>> {
    for kind in StrategyKind::ALL {
        println!("{:<18} {}", kind.as_str(), kind.description());
    }
    Ok(())
}
