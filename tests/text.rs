mod tests {
    use myrtio_torch_composer::math8::dim8;
    use myrtio_torch_composer::text::{
        FALLBACK_CODE, GLYPH_COUNT, GLYPH_ROWS, MAX_MESSAGE_LEN, TextCompositor, TextParams,
        cross_fade, decode_message, glyph_for, glyph_index,
    };

    const COLS: usize = 13;

    fn compositor() -> TextCompositor<COLS> {
        TextCompositor::new(COLS - 2)
    }

    /// Ticks for one full pass of a message `width` columns wide
    fn pass_ticks(width: i32, params: &TextParams) -> usize {
        (width as usize + COLS + 1) * usize::from(params.cycles_per_pixel)
    }

    #[test]
    fn test_cross_fade_splits_value() {
        for fade_base in [0u8, 140, 255] {
            for value in 0..=255u8 {
                let base = dim8(value, fade_base);
                for fader in 0..=255u8 {
                    let (outgoing, incoming) = cross_fade(fader, value, fade_base);
                    assert!(outgoing >= base && incoming >= base);
                    assert_eq!(
                        u16::from(outgoing) + u16::from(incoming) - u16::from(base),
                        u16::from(value)
                    );
                }
            }
        }
    }

    #[test]
    fn test_cross_fade_endpoints() {
        assert_eq!(cross_fade(0, 255, 140), (255, 139));
        assert_eq!(cross_fade(255, 255, 140), (140, 254));
        assert_eq!(cross_fade(128, 0, 140), (0, 0));
    }

    #[test]
    fn test_glyph_lookup() {
        assert_eq!(glyph_index(b' '), 0);
        assert_eq!(glyph_index(b'A'), 33);
        assert_eq!(glyph_index(FALLBACK_CODE), 95);
        assert_eq!(glyph_index(0x85), GLYPH_COUNT - 1);
        assert_eq!(glyph_index(0x10), 95);
        assert_eq!(glyph_index(0xFF), 95);
        assert_eq!(glyph_for(b' ').width(), 3);
        assert_eq!(glyph_for(b'I').width(), 3);
        assert_eq!(glyph_for(b'H').advance(), 6);
        assert_eq!(glyph_for(b'H').column(9), 0);
        for code in 0..=255u8 {
            let glyph = glyph_for(code);
            assert!((1..=7).contains(&glyph.width()));
        }
    }

    #[test]
    fn test_decode_plain_and_escaped() {
        assert_eq!(decode_message(b"Hello%20World").as_slice(), b"Hello World");
        assert_eq!(decode_message(b"%41%62c").as_slice(), b"Abc");
    }

    #[test]
    fn test_decode_accented() {
        assert_eq!(
            decode_message(&[0xC3, 0x84, 0xC3, 0x96, 0xC3, 0x9C]).as_slice(),
            &[0x80, 0x81, 0x82]
        );
        assert_eq!(decode_message(b"%C3%A4%C3%B6%C3%BC").as_slice(), &[0x83, 0x84, 0x85]);
        assert_eq!(decode_message(&[0xC3, b'A', b'x']).as_slice(), &[FALLBACK_CODE, b'x']);
        assert_eq!(decode_message(&[b'a', 0xE9, b'b']).as_slice(), &[b'a', FALLBACK_CODE, b'b']);
    }

    #[test]
    fn test_decode_truncates_cut_sequences() {
        assert_eq!(decode_message(b"abc%4").as_slice(), b"abc");
        assert_eq!(decode_message(b"ab%").as_slice(), b"ab");
        assert_eq!(decode_message(&[b'a', 0xC3]).as_slice(), b"a");
        assert_eq!(decode_message(b"a%C3").as_slice(), b"a");
    }

    #[test]
    fn test_decode_limits_length() {
        let long = [b'x'; 300];
        assert_eq!(decode_message(&long).len(), MAX_MESSAGE_LEN);
    }

    #[test]
    fn test_new_message_starts_off_screen() {
        let mut text = compositor();
        assert!(!text.is_active());
        text.set_message(b"HI");
        assert!(text.is_active());
        assert_eq!(text.pixel_offset(), -(COLS as i32));
        assert_eq!(text.total_width(), 10);
        assert_eq!(text.repeat_count(), 0);
    }

    #[test]
    fn test_hi_shows_every_column_within_one_pass() {
        let params = TextParams::default();
        let mut text = compositor();
        text.set_message(b"HI");

        let mut seen_h = [false; 5];
        let mut seen_i = [false; 3];
        let ticks = pass_ticks(text.total_width(), &params);
        for _ in 0..ticks {
            for x in 0..COLS {
                match text.column_source(x) {
                    Some((0, column)) => seen_h[column] = true,
                    Some((1, column)) => seen_i[column] = true,
                    Some(other) => panic!("unexpected source {other:?}"),
                    None => {}
                }
            }
            assert_eq!(text.repeat_count(), 0);
            text.tick(&params);
        }

        assert!(seen_h.iter().all(|&s| s));
        assert!(seen_i.iter().all(|&s| s));
        assert_eq!(text.repeat_count(), 1);
        assert_eq!(text.pixel_offset(), -(COLS as i32));
    }

    #[test]
    fn test_pass_length_follows_width_and_speed() {
        let cases: [(&[u8], u8); 3] = [(b"A", 1), (b"HI", 3), (b"torch", 5)];
        for (message, cycles) in cases {
            let params = TextParams {
                cycles_per_pixel: cycles,
                ..TextParams::default()
            };
            let mut text = compositor();
            text.set_message(message);
            let ticks = pass_ticks(text.total_width(), &params);
            for _ in 0..ticks - 1 {
                text.tick(&params);
            }
            assert_eq!(text.repeat_count(), 0);
            text.tick(&params);
            assert_eq!(text.repeat_count(), 1);
        }
    }

    #[test]
    fn test_repeat_limit_deactivates() {
        let params = TextParams {
            repeats: 2,
            cycles_per_pixel: 2,
            ..TextParams::default()
        };
        let mut text = compositor();
        text.set_message(b"Hi");
        let ticks = 2 * pass_ticks(text.total_width(), &params);
        for _ in 0..ticks - 1 {
            text.tick(&params);
        }
        assert!(text.is_active());
        text.tick(&params);
        assert!(!text.is_active());
        assert!(
            text.layer()
                .iter()
                .all(|row| row.iter().all(|&level| level == 0))
        );
    }

    #[test]
    fn test_fading_out_deactivates_without_limit() {
        let params = TextParams {
            repeats: 0,
            intensity: 30,
            fade_per_repeat: 15,
            cycles_per_pixel: 1,
            ..TextParams::default()
        };
        let mut text = compositor();
        text.set_message(b"x");
        let pass = pass_ticks(text.total_width(), &params);
        for _ in 0..pass {
            text.tick(&params);
        }
        assert!(text.is_active());
        assert_eq!(text.peak_brightness(&params), Some(15));
        for _ in 0..pass {
            text.tick(&params);
        }
        assert!(!text.is_active());
        assert_eq!(text.peak_brightness(&params), None);
    }

    #[test]
    fn test_repeats_zero_runs_until_faded() {
        let params = TextParams {
            repeats: 0,
            fade_per_repeat: 0,
            cycles_per_pixel: 1,
            ..TextParams::default()
        };
        let mut text = compositor();
        text.set_message(b"ab");
        let pass = pass_ticks(text.total_width(), &params);
        for _ in 0..pass * 20 {
            text.tick(&params);
        }
        assert!(text.is_active());
        assert_eq!(text.repeat_count(), 20);
    }

    #[test]
    fn test_crossfade_frame_for_single_glyph() {
        let params = TextParams::default();
        let mut text = compositor();
        text.set_message(b"I");
        // 13 columns at 5 ticks each bring the glyph to the first column
        for _ in 0..COLS * 5 {
            text.tick(&params);
        }
        assert_eq!(text.pixel_offset(), 0);
        text.tick(&params);

        // I = 0x41, 0x7f, 0x41: bottom and top rows in the outer columns
        assert_eq!(text.brightness(0, 0), 255);
        assert_eq!(text.brightness(0, 6), 255);
        assert_eq!(text.brightness(0, 3), 139);
        assert_eq!(text.brightness(1, 3), 255);
        assert_eq!(text.brightness(2, 0), 255);
        assert_eq!(text.brightness(2, 3), 0);
        assert_eq!(text.brightness(3, 0), 0);
        assert_eq!(text.brightness(0, GLYPH_ROWS), 0);
    }

    #[test]
    fn test_mirrored_layer_is_reflected() {
        let params = TextParams::default();
        let mirrored_params = TextParams {
            mirrored: true,
            ..params
        };
        let mut plain = compositor();
        let mut mirrored = compositor();
        plain.set_message(b"HI");
        mirrored.set_message(b"HI");
        for _ in 0..80 {
            plain.tick(&params);
            mirrored.tick(&mirrored_params);
            for row in 0..GLYPH_ROWS {
                for x in 0..COLS {
                    assert_eq!(plain.brightness(x, row), mirrored.brightness(COLS - 1 - x, row));
                }
            }
        }
    }

    #[test]
    fn test_hidden_columns_stay_dark() {
        let params = TextParams {
            cycles_per_pixel: 1,
            ..TextParams::default()
        };
        let mut text = compositor();
        text.set_message(b"WWWWWWWW");
        for _ in 0..40 {
            text.tick(&params);
            assert_eq!(text.column_source(COLS - 2), None);
            assert_eq!(text.column_source(COLS - 1), None);
        }
    }

    #[test]
    fn test_new_message_restarts_pass() {
        let params = TextParams {
            cycles_per_pixel: 1,
            ..TextParams::default()
        };
        let mut text = compositor();
        text.set_message(b"first");
        for _ in 0..100 {
            text.tick(&params);
        }
        assert!(text.repeat_count() > 0);
        text.set_message(b"second");
        assert_eq!(text.repeat_count(), 0);
        assert_eq!(text.pixel_offset(), -(COLS as i32));
        assert_eq!(text.text(), b"second");
    }

    fn lit_cells(text: &TextCompositor<COLS>) -> usize {
        text.layer()
            .iter()
            .flatten()
            .filter(|&&level| level > 0)
            .count()
    }

    #[test]
    fn test_empty_message_blanks_overlay() {
        let params = TextParams::default();
        for empty in [&b""[..], b"%C3", b"%4"] {
            let mut text = compositor();
            text.set_message(b"HHHH");
            for _ in 0..100 {
                text.tick(&params);
            }
            assert!(lit_cells(&text) > 0);

            text.set_message(empty);
            assert!(!text.is_active());
            assert_eq!(lit_cells(&text), 0);
            text.tick(&params);
            assert_eq!(lit_cells(&text), 0);
        }
    }
}
