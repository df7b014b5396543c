//! Writes `sample_data.csv`: a deterministic demo dataset with a daily date
//! column, correlated numeric columns, seasonal structure, categorical
//! labels, and a sprinkling of missing cells — enough to exercise every
//! chart kind and analysis.

use std::f64::consts::PI;

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
        let z = (-2.0 * u1.ln()).sqrt() * (2.0 * PI * u2).cos();
        mean + std_dev * z
    }
}

fn main() {
    let mut rng = SimpleRng::new(42);

    let regions = ["North", "South", "East", "West"];
    let start = chrono::NaiveDate::from_ymd_opt(2024, 1, 1).expect("valid date");
    let n_days = 150;

    let output_path = "sample_data.csv";
    let mut writer = csv::Writer::from_path(output_path).expect("failed to create output file");
    writer
        .write_record(["date", "temperature", "sales", "visitors", "region"])
        .expect("failed to write header");

    for day in 0..n_days {
        let date = start + chrono::Duration::days(day);

        // monthly cycle plus slow upward drift
        let seasonal = 8.0 * (2.0 * PI * day as f64 / 30.0).sin();
        let temperature = 12.0 + 0.05 * day as f64 + seasonal + rng.gauss(0.0, 1.5);
        let sales = 250.0 + 20.0 * temperature + rng.gauss(0.0, 40.0);
        let visitors = (40.0 + 0.8 * temperature + rng.gauss(0.0, 4.0)).max(0.0) as i64;
        let region = regions[(rng.next_u64() % regions.len() as u64) as usize];

        // leave ~4% of sales cells empty to demo imputation
        let sales_field = if rng.next_f64() < 0.04 {
            String::new()
        } else {
            format!("{sales:.2}")
        };

        writer
            .write_record([
                date.format("%Y-%m-%d").to_string(),
                format!("{temperature:.2}"),
                sales_field,
                visitors.to_string(),
                region.to_string(),
            ])
            .expect("failed to write record");
    }

    writer.flush().expect("failed to flush output");
    println!("Wrote {n_days} rows to {output_path}");
}
