use shellgate_core::api::{redirect, CliError, Location, Phase, RouteTable};

/// Where a request for `location` ends up in `phase`, one policy step only.
pub fn evaluate(phase: &str, location: &str) -> Result<String, CliError> {
    let phase: Phase = phase.parse().map_err(CliError::Command)?;
    let request = Location::parse(location)?;
    let routes = RouteTable::default();

    let outcome = match redirect(&request, phase, &routes) {
        Some(target) => format!("redirect {request} -> {target}"),
        None => format!("allow {request}"),
    };
    tracing::debug!(phase = %phase, outcome = %outcome, "redirect evaluated");
    Ok(outcome)
}

pub fn run(phase: &str, location: &str) -> Result<i32, CliError> {
    println!("{}", evaluate(phase, location)?);
    Ok(0)
}
