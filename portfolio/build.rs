const PRETTY_LOGS: &str = "RUST_LOG_PRETTY";

fn main() {
    println!("cargo::rustc-check-cfg=cfg(tracing_pretty)");
    println!("cargo::rerun-if-env-changed={PRETTY_LOGS}");
    if matches!(std::env::var(PRETTY_LOGS).as_deref(), Ok("1" | "true")) {
        println!("cargo::rustc-cfg=tracing_pretty");
    }
}
