use crate::color::Rgb;

/// Phases a single round attempt moves through
#[derive(Copy, Debug, Clone, PartialEq, Eq, Default)]
pub enum RoundPhase {
    #[default]
    Armed,
    Waiting,
    FalseStart,
    Go,
    Measuring,
    Done,
}

impl RoundPhase {
    /// Color the indicator shows while in this phase
    pub fn color(&self) -> Rgb {
        use RoundPhase::*;
        match self {
            Armed | Waiting => Rgb::BLUE,
            FalseStart => Rgb::RED,
            Go | Measuring => Rgb::GREEN,
            Done => Rgb::OFF,
        }
    }

    /// Successor phase. `false_start` only matters when leaving `Waiting`.
    pub fn next(&self, false_start: bool) -> Option<Self> {
        use RoundPhase::*;
        Some(match self {
            Armed => Waiting,
            Waiting if false_start => FalseStart,
            Waiting => Go,
            FalseStart => Armed,
            Go => Measuring,
            Measuring => Done,
            Done => return None,
        })
    }

    pub fn is_done(&self) -> bool {
        matches!(self, Self::Done)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clean_round_walks_to_done() {
        let mut phase = RoundPhase::default();
        let mut seen = vec![phase];
        while let Some(next) = phase.next(false) {
            phase = next;
            seen.push(phase);
        }
        assert_eq!(
            seen,
            vec![
                RoundPhase::Armed,
                RoundPhase::Waiting,
                RoundPhase::Go,
                RoundPhase::Measuring,
                RoundPhase::Done,
            ]
        );
    }

    #[test]
    fn false_start_loops_back_to_armed() {
        assert_eq!(RoundPhase::Waiting.next(true), Some(RoundPhase::FalseStart));
        assert_eq!(RoundPhase::FalseStart.next(false), Some(RoundPhase::Armed));
        // only the waiting window can produce a false start
        assert_eq!(RoundPhase::Measuring.next(true), Some(RoundPhase::Done));
    }

    #[test]
    fn colors_follow_the_cue_scheme() {
        assert_eq!(RoundPhase::Armed.color(), Rgb::BLUE);
        assert_eq!(RoundPhase::Waiting.color(), Rgb::BLUE);
        assert_eq!(RoundPhase::FalseStart.color(), Rgb::RED);
        assert_eq!(RoundPhase::Go.color(), Rgb::GREEN);
        assert_eq!(RoundPhase::Done.color(), Rgb::OFF);
    }
}
