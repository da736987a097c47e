use anyhow::{Context, Result};

use flight_dashboard::config::DEFAULT_DATA_FILE;
use flight_dashboard::data::loader::REQUIRED_COLUMNS;

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

    fn pick<'a, T>(&mut self, items: &'a [T]) -> &'a T {
        &items[(self.next_u64() % items.len() as u64) as usize]
    }

    /// Box-Muller transform for normal distribution
    fn gauss(&mut self, mean: f64, std_dev: f64) -> f64 {
        let u1 = self.next_f64().max(1e-15);
        let u2 = self.next_f64();
        let z = (-2.0 * u1.ln()).sqrt() * (2.0 * std::f64::consts::PI * u2).cos();
        mean + std_dev * z
    }
}

const AIRLINES: [(&str, f64); 5] = [
    ("American", 8.0),
    ("Delta", 4.0),
    ("JetBlue", 12.0),
    ("Southwest", 6.0),
    ("United", 9.0),
];

const AIRPORTS: [&str; 12] = [
    "ATL", "BOS", "DEN", "DFW", "JFK", "LAS", "LAX", "MIA", "ORD", "SEA", "SFO", "PHX",
];

const CANCELLATION_CODES: [&str; 4] = ["A", "B", "C", "D"];

const FLIGHTS: usize = 5000;

fn main() -> Result<()> {
    let mut rng = SimpleRng::new(42);
    let output_path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| DEFAULT_DATA_FILE.to_string());

    let mut writer = csv::Writer::from_path(&output_path)
        .with_context(|| format!("creating {output_path}"))?;
    writer.write_record(REQUIRED_COLUMNS)?;

    let mut cancelled_total = 0;
    for _ in 0..FLIGHTS {
        let &(airline, base_delay) = rng.pick(&AIRLINES);
        let origin = *rng.pick(&AIRPORTS);
        let mut dest = *rng.pick(&AIRPORTS);
        while dest == origin {
            dest = *rng.pick(&AIRPORTS);
        }
        let month = 1 + rng.next_u64() % 12;

        // Winter months carry more weather trouble.
        let winter = matches!(month, 12 | 1 | 2);
        let cancel_rate = if winter { 0.05 } else { 0.015 };
        let cancelled = rng.next_f64() < cancel_rate;

        let row: Vec<String> = if cancelled {
            cancelled_total += 1;
            let code = if winter && rng.next_f64() < 0.6 {
                "B"
            } else {
                *rng.pick(&CANCELLATION_CODES)
            };
            vec![
                airline.to_string(),
                format!("{origin}-{dest}"),
                month.to_string(),
                origin.to_string(),
                // Cancelled flights have no measured delays.
                String::new(),
                String::new(),
                String::new(),
                String::new(),
                String::new(),
                String::new(),
                String::new(),
                "1".to_string(),
                code.to_string(),
            ]
        } else {
            let weather = if winter {
                rng.gauss(6.0, 8.0).max(0.0)
            } else {
                rng.gauss(1.0, 3.0).max(0.0)
            };
            let carrier = rng.gauss(base_delay, 6.0).max(0.0);
            let nas = rng.gauss(3.0, 4.0).max(0.0);
            let security = if rng.next_f64() < 0.02 { 5.0 } else { 0.0 };
            let late = rng.gauss(4.0, 6.0).max(0.0);
            let dep = carrier + weather + nas + security + late + rng.gauss(-5.0, 5.0);
            let arr = dep + rng.gauss(-3.0, 6.0);
            vec![
                airline.to_string(),
                format!("{origin}-{dest}"),
                month.to_string(),
                origin.to_string(),
                format!("{arr:.1}"),
                format!("{dep:.1}"),
                format!("{carrier:.1}"),
                format!("{weather:.1}"),
                format!("{nas:.1}"),
                format!("{security:.1}"),
                format!("{late:.1}"),
                "0".to_string(),
                String::new(),
            ]
        };
        writer.write_record(&row)?;
    }
    writer.flush()?;

    println!("Wrote {FLIGHTS} flights ({cancelled_total} cancelled) to {output_path}");
    Ok(())
}
