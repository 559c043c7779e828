//! Tests for DecisionState transitions.

#[cfg(test)]
mod tests {
    use super::super::decision::{DecisionState, Directive, ResponseOutcome, DEFAULT_SPEED};

    const MAX_SPEED: f32 = 7.0;
    const STOP_TIMEOUT: f32 = 10.0;

    #[test]
    fn test_initial_state() {
        let state = DecisionState::default();
        assert_eq!(state.speed(), DEFAULT_SPEED);
        assert_eq!(state.directive(), Directive::Hold);
        assert!(!state.is_stopped());
        assert_eq!(state.stop_elapsed(), 0.0);
    }

    #[test]
    fn test_follow_response() {
        let mut state = DecisionState::default();
        let outcome = state.apply_response("4,t,Hello", MAX_SPEED);

        assert!(matches!(outcome, ResponseOutcome::Applied(ref p) if p.message == "Hello"));
        assert_eq!(state.speed(), 4.0);
        assert_eq!(state.directive(), Directive::Toward);
        assert!(!state.is_stopped());
    }

    #[test]
    fn test_zero_speed_enters_stopped() {
        let mut state = DecisionState::default();
        state.apply_response("0,p,Shh", MAX_SPEED);

        assert_eq!(state.speed(), 0.0);
        assert!(state.is_stopped());
        assert_eq!(state.stop_elapsed(), 0.0);
        assert_eq!(state.directive(), Directive::Hold);
        assert!(!state.can_move());
    }

    #[test]
    fn test_repeated_zero_resets_stop_timer() {
        let mut state = DecisionState::default();
        state.apply_response("0,p,Shh", MAX_SPEED);
        state.tick_stop_timeout(4.0, STOP_TIMEOUT);
        assert_eq!(state.stop_elapsed(), 4.0);

        state.apply_response("0,p,Still scared", MAX_SPEED);
        assert_eq!(state.stop_elapsed(), 0.0);
        assert!(state.is_stopped());
    }

    #[test]
    fn test_unparseable_speed_keeps_previous() {
        let mut state = DecisionState::default();
        state.apply_response("5,a,Run!", MAX_SPEED);

        state.apply_response("x,t,Hi", MAX_SPEED);
        assert_eq!(state.speed(), 5.0);
        assert_eq!(state.directive(), Directive::Toward);

        // Stopped тоже не трогаем
        state.apply_response("0,p,Freeze", MAX_SPEED);
        state.apply_response("fast,t,Go", MAX_SPEED);
        assert!(state.is_stopped());
        assert_eq!(state.speed(), 0.0);
    }

    #[test]
    fn test_speed_is_clamped() {
        let mut state = DecisionState::default();

        for (raw, expected) in [
            ("12,t,x", MAX_SPEED),
            ("1e9,t,x", MAX_SPEED),
            ("inf,t,x", MAX_SPEED),
            ("-3,t,x", 0.0),
            ("-inf,t,x", 0.0),
            ("6.5,t,x", 6.5),
        ] {
            state.apply_response(raw, MAX_SPEED);
            assert!(state.speed() >= 0.0 && state.speed() <= MAX_SPEED, "raw: {}", raw);
            assert_eq!(state.speed(), expected, "raw: {}", raw);
        }
    }

    #[test]
    fn test_negative_speed_clamps_to_stop() {
        let mut state = DecisionState::default();
        state.apply_response("-2,a,No!", MAX_SPEED);
        assert!(state.is_stopped());
        assert_eq!(state.speed(), 0.0);
    }

    #[test]
    fn test_malformed_response_fallback() {
        for raw in ["", "garbage", "6,a", "I refuse to answer in your format"] {
            let mut state = DecisionState::default();
            state.apply_response("6,a,Run!", MAX_SPEED);

            let outcome = state.apply_response(raw, MAX_SPEED);
            assert!(matches!(outcome, ResponseOutcome::Fallback(_)), "raw: {:?}", raw);
            assert_eq!(state.speed(), DEFAULT_SPEED);
            assert_eq!(state.directive(), Directive::Hold);
        }
    }

    #[test]
    fn test_fallback_releases_stop() {
        let mut state = DecisionState::default();
        state.apply_response("0,p,Shh", MAX_SPEED);

        state.apply_response("broken", MAX_SPEED);
        assert!(!state.is_stopped());
        assert!(state.can_move());
    }

    #[test]
    fn test_unknown_direction_collapses_to_hold() {
        let mut state = DecisionState::default();
        state.apply_response("3,t,Coming", MAX_SPEED);
        state.apply_response("3,z,Huh", MAX_SPEED);
        assert_eq!(state.directive(), Directive::Hold);
    }

    #[test]
    fn test_empty_direction_keeps_directive() {
        let mut state = DecisionState::default();
        state.apply_response("3,a,Bye", MAX_SPEED);
        state.apply_response("2, ,...", MAX_SPEED);
        assert_eq!(state.directive(), Directive::Away);
        assert_eq!(state.speed(), 2.0);
    }

    #[test]
    fn test_stop_timeout_recovery() {
        let mut state = DecisionState::default();
        state.apply_response("0,a,Frozen", MAX_SPEED);

        let delta = 0.5;
        let mut recovered_at = None;
        for tick in 0..40 {
            if state.tick_stop_timeout(delta, STOP_TIMEOUT) {
                recovered_at = Some(tick);
                break;
            }
            assert!(state.is_stopped());
        }

        // 20 тиков по 0.5 = 10 секунд
        assert_eq!(recovered_at, Some(19));
        assert_eq!(state.speed(), DEFAULT_SPEED);
        assert_eq!(state.directive(), Directive::Hold);
        assert!(!state.is_stopped());
    }

    #[test]
    fn test_stop_timer_idle_when_moving() {
        let mut state = DecisionState::default();
        assert!(!state.tick_stop_timeout(100.0, STOP_TIMEOUT));
        assert_eq!(state.stop_elapsed(), 0.0);
    }
}
