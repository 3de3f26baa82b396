use planedraw::{CompiledExpr, LutThreading, PlaneDims, Representation, build_lut};

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();

    let src = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "x 8 - abs y 4 - abs + 6 <= 9 0 ?".to_owned());
    let expr = CompiledExpr::compile(&src, Representation::Tree)?;
    let lut = build_lut(&expr, PlaneDims::new(17, 9), &LutThreading::default())?;

    println!("{}", expr.source());
    for y in 0..lut.height() {
        let row = lut.row(y).unwrap_or(&[]);
        let line: Vec<String> = row.iter().map(|v| format!("{v:>3}")).collect();
        println!("{}", line.join(""));
    }

    Ok(())
}
