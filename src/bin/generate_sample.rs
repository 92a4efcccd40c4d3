use std::fs;
use std::path::Path;

use serde_json::json;

/// Minimal deterministic PRNG (xoshiro256**)
struct SimpleRng {
    state: [u64; 4],
}

impl SimpleRng {
    fn new(seed: u64) -> Self {
        let mut s = [0u64; 4];
        let mut x = seed;
        for slot in &mut s {
            x = x.wrapping_mul(6364136223846793005).wrapping_add(1);
            *slot = x;
        }
        SimpleRng { state: s }
    }

    fn next_u64(&mut self) -> u64 {
        let result = (self.state[1].wrapping_mul(5))
            .rotate_left(7)
            .wrapping_mul(9);
        let t = self.state[1] << 17;
        self.state[2] ^= self.state[0];
        self.state[3] ^= self.state[1];
        self.state[1] ^= self.state[2];
        self.state[0] ^= self.state[3];
        self.state[2] ^= t;
        self.state[3] = self.state[3].rotate_left(45);
        result
    }

    fn next_f64(&mut self) -> f64 {
        (self.next_u64() >> 11) as f64 / (1u64 << 53) as f64
    }

    /// Box-Muller transform for normal distribution
    fn gauss(&mut self, mean: f64, std_dev: f64) -> f64 {
        let u1 = self.next_f64().max(1e-15);
        let u2 = self.next_f64();
        let z = (-2.0 * u1.ln()).sqrt() * (2.0 * std::f64::consts::PI * u2).cos();
        mean + std_dev * z
    }
}

// Step-size grid used by the real sweeps
const DT_GRID: [f64; 6] = [0.0005, 0.001, 0.002, 0.005, 0.01, 0.02];

/// Audit rows following tail_median ≈ c·dt^m with multiplicative noise.
fn power_law_rows(rng: &mut SimpleRng, c: f64, m: f64, sigma: f64) -> Vec<serde_json::Value> {
    DT_GRID
        .iter()
        .map(|&dt| {
            let tail = c * dt.powf(m) * 10f64.powf(rng.gauss(0.0, sigma));
            json!({ "dt": dt, "tail_median": tail, "runs": 5 })
        })
        .collect()
}

fn write_json(path: &Path, doc: &serde_json::Value) {
    let text = serde_json::to_string_pretty(doc).expect("Failed to serialize JSON");
    fs::write(path, text).expect("Failed to write JSON file");
    println!("Wrote {}", path.display());
}

fn write_cap_csv(path: &Path, rng: &mut SimpleRng) {
    let mut writer = csv::Writer::from_path(path).expect("Failed to create CSV file");
    writer
        .write_record([
            "dt",
            "fraction_capped_mean",
            "fraction_capped_ci95_low",
            "fraction_capped_ci95_high",
        ])
        .expect("Failed to write CSV header");
    for &dt in &DT_GRID {
        let mean = (0.02 + 9.0 * dt + rng.gauss(0.0, 0.01)).clamp(0.0, 1.0);
        let half = 0.015 + rng.next_f64() * 0.01;
        writer
            .write_record(&[
                dt.to_string(),
                format!("{mean:.4}"),
                format!("{:.4}", (mean - half).max(0.0)),
                format!("{:.4}", (mean + half).min(1.0)),
            ])
            .expect("Failed to write CSV row");
    }
    writer.flush().expect("Failed to flush CSV");
    println!("Wrote {}", path.display());
}

fn main() {
    let mut rng = SimpleRng::new(42);
    let dir = Path::new("demo_inputs");
    fs::create_dir_all(dir).expect("Failed to create demo_inputs");

    // the two audit files exercise both accepted list keys
    let default_doc = json!({ "report": power_law_rows(&mut rng, 2.5, 2.0, 0.03) });
    write_json(&dir.join("lf_default_audit.json"), &default_doc);

    let thrash_doc = json!({ "series": power_law_rows(&mut rng, 3.2, 2.0, 0.05) });
    write_json(&dir.join("lf_thrash_audit.json"), &thrash_doc);

    // scramble: dt dependence destroyed, just noise around a floor
    let points: Vec<serde_json::Value> = DT_GRID
        .iter()
        .map(|&dt| {
            let tail = 10f64.powf(rng.gauss(-3.7, 0.25));
            json!([dt, tail])
        })
        .collect();
    let scramble_doc = json!({ "points": points, "n": DT_GRID.len() });
    write_json(&dir.join("lf_scramble_summary.json"), &scramble_doc);

    write_cap_csv(&dir.join("cap_vs_dt.csv"), &mut rng);

    // round-trip demo: leapfrog retraces its path, euler does not
    let reversibility_doc = json!({
        "k": 4.0,
        "dt": 0.01,
        "normalized_rt_error_leapfrog": 3.0e-7 * 10f64.powf(rng.gauss(0.0, 0.1)),
        "normalized_rt_error_euler": 0.2 * 10f64.powf(rng.gauss(0.0, 0.1)),
    });
    write_json(&dir.join("reversibility_demo.json"), &reversibility_doc);

    println!("Try:");
    println!("  paper-figs --default demo_inputs/lf_default_audit.json \\");
    println!("      --thrash demo_inputs/lf_thrash_audit.json \\");
    println!("      --scramble demo_inputs/lf_scramble_summary.json \\");
    println!("      --show-fit --out demo_out/fig1_lf_precond_small.svg");
    println!("  cap_engagement --input demo_inputs/cap_vs_dt.csv --out demo_out/fig_cap.svg");
    println!("  reversibility --input demo_inputs/reversibility_demo.json --out demo_out/fig_reversibility.svg");
}
