//! Game systems: initialization, payoff computation, strategy updates and
//! the round that composes them.

pub mod init;
pub mod payoff;
pub mod round;
pub mod update;

pub use init::{assign_strategies, coin_flip_initializer, Initializer};
pub use payoff::{
    accumulate_payoffs, payoff, payoff_raw, play_plain, play_prisoners_dilemma,
    play_with_trust_and_pd, GameResult, Payoffs, DEFAULT_FLIP_PROB,
};
pub use round::{GameProtocol, GameRound, RoundOutcome};
pub use update::{
    fermi_probability, stable_logistic, update_strategies, UpdateRule, FERMI_TEMPERATURE,
    TIE_PROBABILITY,
};
