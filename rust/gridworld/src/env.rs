use crate::sampling::pick_next;
use crate::*;
use itertools::Itertools;
use rand::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

/// Default reward is minus. The agent has to reach the goal fast.
pub const DEFAULT_REWARD: Continous = -0.04;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EnvConfig {
    pub variant: GridVariant,

    /// Probability of moving in the intended direction. The rest is split between
    /// the two perpendicular directions.
    pub move_prob: Continous,

    pub default_reward: Continous,

    /// Seed for reward placement and transition sampling; entropy when absent.
    pub seed: Option<u64>,
}

impl Default for EnvConfig {
    fn default() -> Self {
        Self {
            variant: GridVariant::A,
            move_prob: 1.0,
            default_reward: DEFAULT_REWARD,
            seed: None,
        }
    }
}

impl EnvConfig {
    /// Config for a variant given by name, the way experiments refer to them.
    pub fn named(variant: &str) -> Result<Self> {
        Ok(Self {
            variant: variant.parse()?,
            ..Self::default()
        })
    }

    pub fn validate(&self) -> Result<()> {
        if !(0. ..=1.).contains(&self.move_prob) {
            return Err(Error::InvalidProbability {
                name: "move_prob",
                value: self.move_prob,
            });
        }

        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct StepInfo {
    /// `None` when the agent could not act from its position.
    pub next_state: Option<Position>,
    pub reward: Continous,
    pub done: bool,
}

/// The 9x9 maze: a static layout plus one reward cell placed per episode.
#[derive(Debug)]
pub struct Environment {
    config: EnvConfig,
    template: Grid,
    grid: Grid,
    start: Position,
    agent: Position,
    reward_position: Position,
    rng: StdRng,
}

impl Environment {
    pub fn new(config: EnvConfig) -> Result<Self> {
        config.validate()?;

        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        let template = config.variant.template();
        let start = config.variant.start();

        let mut env = Self {
            grid: template.clone(),
            template,
            start,
            agent: start,
            reward_position: start,
            rng,
            config,
        };
        env.reset();

        Ok(env)
    }

    pub fn config(&self) -> &EnvConfig {
        &self.config
    }

    pub fn variant(&self) -> GridVariant {
        self.config.variant
    }

    pub fn move_prob(&self) -> Continous {
        self.config.move_prob
    }

    /// Restores the layout, puts the agent back at the start and re-draws the reward cell.
    pub fn reset(&mut self) -> (&Grid, Position) {
        self.agent = self.start;
        self.grid = self.template.clone();

        let draw = self.rng.gen_range(0..REWARD_DRAWS);
        self.reward_position = self.config.variant.reward_slot(draw);
        debug_assert_eq!(self.template.get(self.reward_position), Some(Cell::Ordinary));
        self.grid.put(self.reward_position, Cell::Reward);
        debug!(
            variant = %self.config.variant,
            draw,
            reward = %self.reward_position,
            "environment reset"
        );

        (&self.grid, self.agent)
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn agent(&self) -> Position {
        self.agent
    }

    pub fn reward_position(&self) -> Position {
        self.reward_position
    }

    pub fn row_length(&self) -> usize {
        self.grid.row_length()
    }

    pub fn column_length(&self) -> usize {
        self.grid.column_length()
    }

    pub fn actions(&self) -> [Action; 4] {
        Action::ALL
    }

    /// Every position the agent may occupy. Block cells are not states.
    pub fn states(&self) -> Vec<Position> {
        self.grid
            .iter()
            .filter(|&(_, cell)| cell != Cell::Block)
            .map(|(p, _)| p)
            .collect_vec()
    }

    /// Moves the agent without sampling. Block and out-of-grid positions are rejected.
    pub fn place_agent(&mut self, pos: Position) -> Result<()> {
        match self.grid.get(pos) {
            None => Err(Error::OutOfBounds(pos)),
            Some(Cell::Block) => Err(Error::BlockedPosition(pos)),
            Some(_) => {
                self.agent = pos;
                Ok(())
            }
        }
    }

    pub fn can_action_at(&self, pos: Position) -> bool {
        self.grid.get(pos) == Some(Cell::Ordinary)
    }

    pub fn transition_distribution(&self, state: Position, action: Action) -> TransitionDistribution {
        let mut dist = TransitionDistribution::default();
        if !self.can_action_at(state) {
            // Already on a terminal cell.
            return dist;
        }

        let side = (1. - self.config.move_prob) / 2.;
        for a in Action::ALL {
            let probability = if a == action {
                self.config.move_prob
            } else if a == action.opposite() {
                0.
            } else {
                side
            };

            let next_state = self.move_from(state, a);
            let (reward, done) = self.reward_func(next_state);
            dist.accumulate(Transition {
                next_state,
                probability,
                reward,
                done,
            });
        }

        dist
    }

    /// Distributions for every state and action, the MDP view of the current grid.
    pub fn transitions(&self) -> Transitions {
        self.states()
            .into_iter()
            .cartesian_product(Action::ALL)
            .map(|(s, a)| ((s, a), self.transition_distribution(s, a)))
            .collect()
    }

    pub fn reward_func(&self, state: Position) -> (Continous, bool) {
        match self.grid.get(state) {
            Some(Cell::Reward) => (1., true),
            Some(Cell::Damage) => (-1., true),
            _ => (self.config.default_reward, false),
        }
    }

    pub fn step(&mut self, action: Action) -> Result<StepInfo> {
        let dist = self.transition_distribution(self.agent, action);
        if dist.is_empty() {
            let (reward, _) = self.reward_func(self.agent);
            trace!(agent = %self.agent, %action, reward, "no transition, forcing termination");
            return Ok(StepInfo {
                next_state: None,
                reward,
                done: true,
            });
        }

        let next_state = pick_next(&mut self.rng, dist.as_slice())?;
        let (reward, done) = self.reward_func(next_state);
        trace!(from = %self.agent, %action, to = %next_state, reward, done, "step");
        self.agent = next_state;

        Ok(StepInfo {
            next_state: Some(next_state),
            reward,
            done,
        })
    }

    pub fn render(&self, partial: bool) -> Observation {
        Observation::render(&self.grid, self.agent, partial)
    }

    /// Text view with the agent drawn as `A`.
    pub fn render_ansi(&self) -> String {
        self.grid
            .to_string()
            .lines()
            .enumerate()
            .map(|(r, line)| {
                line.chars()
                    .enumerate()
                    .map(|(c, ch)| {
                        if Position::new(r as Discrete, c as Discrete) == self.agent {
                            'A'
                        } else {
                            ch
                        }
                    })
                    .collect::<String>()
            })
            .join("\n")
    }

    fn move_from(&self, state: Position, action: Action) -> Position {
        let next_state = state.moved(action);
        match self.grid.get(next_state) {
            // Leaving the grid or bumping into a block keeps the agent in place.
            None | Some(Cell::Block) => state,
            Some(_) => next_state,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use float_eq::*;
    use rstest::rstest;

    fn env(variant: GridVariant, move_prob: Continous, seed: u64) -> Environment {
        Environment::new(EnvConfig {
            variant,
            move_prob,
            seed: Some(seed),
            ..EnvConfig::default()
        })
        .unwrap()
    }

    #[test]
    fn up_from_start_bumps_into_block() {
        let e = env(GridVariant::A, 1.0, 1);
        let start = Position::new(4, 7);
        assert_eq!(e.agent(), start);
        assert_eq!(e.grid().get(Position::new(3, 7)), Some(Cell::Block));

        let dist = e.transition_distribution(start, Action::Up);
        assert_eq!(dist.len(), 1);
        let t = dist.get(start).unwrap();
        assert_float_eq!(t.probability, 1., abs <= 1e-12);
        assert_float_eq!(t.reward, -0.04, abs <= 1e-12);
        assert!(!t.done);
    }

    #[rstest]
    #[case(GridVariant::A)]
    #[case(GridVariant::B)]
    fn every_reset_holds_exactly_one_reward(#[case] variant: GridVariant) {
        let mut e = env(variant, 1.0, 17);
        for _ in 0..200 {
            let (grid, _) = e.reset();
            let rewards = grid.positions_of(Cell::Reward);
            assert_eq!(rewards, vec![e.reward_position()]);
        }
    }

    #[test]
    fn left_from_start_moves_deterministically() {
        let mut e = env(GridVariant::A, 1.0, 1);
        let dist = e.transition_distribution(e.agent(), Action::Left);
        assert_float_eq!(dist.probability(Position::new(4, 6)), 1., abs <= 1e-12);

        let si = e.step(Action::Left).unwrap();
        assert_eq!(si.next_state, Some(Position::new(4, 6)));
        assert_float_eq!(si.reward, -0.04, abs <= 1e-12);
        assert!(!si.done);
        assert_eq!(e.agent(), Position::new(4, 6));
    }

    #[rstest]
    #[case(Action::Up)]
    #[case(Action::Left)]
    #[case(Action::Down)]
    #[case(Action::Right)]
    fn slippery_move_splits_between_perpendiculars(#[case] action: Action) {
        // (4, 6) in layout B has ordinary neighbours on every side.
        let e = env(GridVariant::B, 0.8, 3);
        let state = Position::new(4, 6);
        let dist = e.transition_distribution(state, action);

        assert_float_eq!(dist.total(), 1., abs <= 1e-12);
        assert_float_eq!(dist.probability(state.moved(action)), 0.8, abs <= 1e-12);
        assert_float_eq!(dist.probability(state.moved(action.opposite())), 0., abs <= 1e-12);
        for side in Action::ALL.iter().filter(|a| a.is_perpendicular_to(action)) {
            assert_float_eq!(dist.probability(state.moved(*side)), 0.1, abs <= 1e-12);
        }
    }

    #[test]
    fn terminal_cells_have_no_transitions() {
        let e = env(GridVariant::A, 0.8, 5);
        let reward = e.reward_position();
        assert!(e.transition_distribution(reward, Action::Up).is_empty());
        assert!(e
            .transition_distribution(Position::new(0, 0), Action::Down)
            .is_empty());
    }

    #[rstest]
    #[case(Action::Up)]
    #[case(Action::Left)]
    #[case(Action::Down)]
    #[case(Action::Right)]
    fn standing_on_reward_ends_with_reward(#[case] action: Action) {
        let mut e = env(GridVariant::A, 1.0, 11);
        let reward = e.reward_position();
        e.place_agent(reward).unwrap();

        let si = e.step(action).unwrap();
        assert_eq!(si.next_state, None);
        assert_float_eq!(si.reward, 1., abs <= 1e-12);
        assert!(si.done);
        assert_eq!(e.agent(), reward);
    }

    #[test]
    fn stepping_onto_reward_terminates() {
        let mut e = env(GridVariant::B, 1.0, 13);
        let reward = e.reward_position();
        // Every B slot is in column 3; approach from below unless that is the wall.
        let from = Position::new(reward.row + 1, reward.column);
        let from = if e.can_action_at(from) {
            from
        } else {
            Position::new(reward.row - 1, reward.column)
        };
        e.place_agent(from).unwrap();
        let action = if from.row > reward.row {
            Action::Up
        } else {
            Action::Down
        };

        let si = e.step(action).unwrap();
        assert_eq!(si.next_state, Some(reward));
        assert_float_eq!(si.reward, 1., abs <= 1e-12);
        assert!(si.done);
    }

    #[test]
    fn damage_cells_end_with_penalty() {
        let mut e = env(GridVariant::A, 1.0, 17);
        e.grid.set(Position::new(4, 6), Cell::Damage).unwrap();

        let si = e.step(Action::Left).unwrap();
        assert_eq!(si.next_state, Some(Position::new(4, 6)));
        assert_float_eq!(si.reward, -1., abs <= 1e-12);
        assert!(si.done);
    }

    #[test]
    fn place_agent_rejects_blocks_and_outside() {
        let mut e = env(GridVariant::A, 1.0, 19);
        assert!(matches!(
            e.place_agent(Position::new(3, 7)),
            Err(Error::BlockedPosition(_))
        ));
        assert!(matches!(
            e.place_agent(Position::new(-1, 7)),
            Err(Error::OutOfBounds(_))
        ));
        assert_eq!(e.agent(), Position::new(4, 7));
    }

    #[test]
    fn invalid_move_prob_is_rejected() {
        let err = Environment::new(EnvConfig {
            move_prob: 1.5,
            ..EnvConfig::default()
        })
        .unwrap_err();
        assert!(matches!(
            err,
            Error::InvalidProbability {
                name: "move_prob",
                ..
            }
        ));
    }

    #[test]
    fn named_config_rejects_unknown_variant() {
        assert_eq!(EnvConfig::named("B").unwrap().variant, GridVariant::B);
        assert!(matches!(
            EnvConfig::named("C"),
            Err(Error::UnknownGridVariant(_))
        ));
    }

    #[test]
    fn states_exclude_blocks() {
        let e = env(GridVariant::A, 1.0, 23);
        let states = e.states();
        // 3 horizontal corridors of 7 plus 4 connecting cells in column 1.
        assert_eq!(states.len(), 25);
        assert!(states.iter().all(|&p| e.grid().get(p) != Some(Cell::Block)));
        assert_eq!(e.transitions().len(), 25 * 4);
    }

    #[test]
    fn ansi_render_marks_agent() {
        let e = env(GridVariant::A, 1.0, 29);
        let text = e.render_ansi();
        let row = text.lines().nth(4).unwrap();
        assert_eq!(row, "#......A#");
    }
}
