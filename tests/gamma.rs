mod tests {
    use myrtio_torch_composer::gamma::{
        DEFAULT_CURVE_EXPONENT, PWM_TABLE, exponential_duty, exponential_table, pwm_for_level,
    };

    #[test]
    fn test_table_matches_generated_curve() {
        assert_eq!(exponential_table(DEFAULT_CURVE_EXPONENT), PWM_TABLE);
    }

    #[test]
    fn test_table_is_monotonic_and_spans_full_range() {
        assert_eq!(PWM_TABLE[0], 0);
        assert_eq!(PWM_TABLE[31], 255);
        assert!(PWM_TABLE.windows(2).all(|w| w[0] <= w[1]));
    }

    #[test]
    fn test_pwm_for_level_saturates() {
        assert_eq!(pwm_for_level(0), 0);
        assert_eq!(pwm_for_level(16), PWM_TABLE[16]);
        assert_eq!(pwm_for_level(31), 255);
        assert_eq!(pwm_for_level(200), 255);
    }

    #[test]
    fn test_exponential_duty_endpoints() {
        for exponent in [1.0, 2.5, 4.0, 6.0] {
            assert_eq!(exponential_duty(0, exponent), 0);
            assert_eq!(exponential_duty(255, exponent), 255);
        }
    }

    #[test]
    fn test_non_positive_exponent_is_linear() {
        assert_eq!(exponential_duty(77, 0.0), 77);
        assert_eq!(exponential_duty(200, -1.0), 200);
    }

    #[test]
    fn test_steeper_curve_is_darker() {
        assert!(exponential_duty(128, 6.0) < exponential_duty(128, 2.0));
    }
}
