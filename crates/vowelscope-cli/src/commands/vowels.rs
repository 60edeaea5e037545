//! IPA vowel table listing and point classification.

use clap::Args;
use vowelscope_analysis::VowelTable;
use vowelscope_analysis::vowel::MAX_MATCH_DISTANCE;

#[derive(Args)]
pub struct VowelsArgs {
    /// First formant in Hz to classify
    #[arg(long, requires = "f2")]
    f1: Option<f32>,

    /// Second formant in Hz to classify
    #[arg(long, requires = "f1")]
    f2: Option<f32>,

    /// Match threshold in Hz
    #[arg(long, default_value_t = MAX_MATCH_DISTANCE)]
    max_distance: f32,

    /// Print JSON instead of a table
    #[arg(long)]
    json: bool,
}

pub fn run(args: VowelsArgs) -> anyhow::Result<()> {
    let table = VowelTable::ipa();

    if let (Some(f1), Some(f2)) = (args.f1, args.f2) {
        let nearest = table.nearest_within(f1, f2, args.max_distance);
        if args.json {
            println!("{}", serde_json::to_string_pretty(&nearest)?);
            return Ok(());
        }
        match nearest {
            Some(m) => println!(
                "{} (F1 {} Hz, F2 {} Hz), distance {:.1} Hz",
                m.symbol, m.f1, m.f2, m.distance
            ),
            None => println!(
                "No vowel within {} Hz of F1 {} Hz, F2 {} Hz",
                args.max_distance, f1, f2
            ),
        }
        return Ok(());
    }

    if args.json {
        let entries: Vec<serde_json::Value> = table
            .entries()
            .iter()
            .map(|v| serde_json::json!({ "symbol": v.symbol, "f1": v.f1, "f2": v.f2 }))
            .collect();
        println!("{}", serde_json::to_string_pretty(&entries)?);
        return Ok(());
    }

    println!("IPA vowels ({} entries):", table.entries().len());
    println!("  {:<6}  {:>7}  {:>7}", "Symbol", "F1 (Hz)", "F2 (Hz)");
    println!("  {:<6}  {:>7}  {:>7}", "------", "-------", "-------");
    for v in table.entries() {
        println!("  {:<6}  {:>7.0}  {:>7.0}", v.symbol, v.f1, v.f2);
    }
    Ok(())
}
