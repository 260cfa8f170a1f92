use gridworld::*;

#[allow(dead_code)]
pub fn seeded_env(variant: &str, move_prob: Continous, seed: u64) -> Environment {
    let config = EnvConfig {
        move_prob,
        seed: Some(seed),
        ..EnvConfig::named(variant).unwrap()
    };
    Environment::new(config).unwrap()
}

#[allow(dead_code)]
pub fn pixel(obs: &Observation, pos: Position) -> [f32; 3] {
    let (r, c) = (pos.row as usize, pos.column as usize);
    [0, 1, 2].map(|ch| obs.pixels()[[r, c, ch]])
}

#[allow(dead_code)]
pub fn lit_cells(obs: &Observation) -> Vec<Position> {
    let (rows, cols, _) = obs.shape();
    let mut lit = Vec::new();
    for r in 0..rows {
        for c in 0..cols {
            let p = Position::new(r as Discrete, c as Discrete);
            if pixel(obs, p).iter().any(|&v| v > 0.) {
                lit.push(p);
            }
        }
    }
    lit
}
