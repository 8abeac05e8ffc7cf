mod tests {
    use myrtio_torch_composer::topology::{Topology, TopologyError};

    fn all_variants(pixels_per_row: u16, rows: u16) -> impl Iterator<Item = Topology> {
        (0u8..16).map(move |flags| {
            let mut topology = Topology::new(pixels_per_row, rows);
            if flags & 1 != 0 {
                topology = topology.with_x_reversed();
            }
            if flags & 2 != 0 {
                topology = topology.with_y_reversed();
            }
            if flags & 4 != 0 {
                topology = topology.with_alternating();
            }
            if flags & 8 != 0 {
                topology = topology.with_swapped_xy();
            }
            topology
        })
    }

    #[test]
    fn test_mapping_is_bijective_for_every_winding() {
        for (cols, rows) in [(13, 18), (4, 3), (1, 5), (7, 1)] {
            for topology in all_variants(cols, rows) {
                let count = topology.pixel_count();
                let mut seen = vec![false; count];
                for y in 0..topology.size_y() {
                    for x in 0..topology.size_x() {
                        let index = topology
                            .physical_index(x, y)
                            .expect("in-range coordinate must map");
                        assert!(index < count, "{topology:?} maps ({x},{y}) to {index}");
                        assert!(!seen[index], "{topology:?} maps twice to {index}");
                        seen[index] = true;
                    }
                }
                assert!(seen.iter().all(|&s| s), "{topology:?} leaves gaps");
            }
        }
    }

    #[test]
    fn test_out_of_range_maps_to_nothing() {
        let topology = Topology::new(13, 18);
        assert_eq!(topology.physical_index(13, 0), None);
        assert_eq!(topology.physical_index(0, 18), None);
        let swapped = topology.with_swapped_xy();
        assert_eq!(swapped.physical_index(17, 12), Some(233));
        assert_eq!(swapped.physical_index(18, 0), None);
    }

    #[test]
    fn test_row_major_and_reversed() {
        let plain = Topology::new(4, 3);
        assert_eq!(plain.physical_index(0, 0), Some(0));
        assert_eq!(plain.physical_index(3, 0), Some(3));
        assert_eq!(plain.physical_index(1, 2), Some(9));

        let reversed = Topology::new(4, 3).with_x_reversed();
        assert_eq!(reversed.physical_index(0, 0), Some(3));
        assert_eq!(reversed.physical_index(3, 1), Some(4));

        let upside = Topology::new(4, 3).with_y_reversed();
        assert_eq!(upside.physical_index(0, 0), Some(8));
    }

    #[test]
    fn test_serpentine_rows() {
        let serpentine = Topology::new(4, 3).with_alternating();
        assert_eq!(serpentine.physical_index(0, 0), Some(0));
        assert_eq!(serpentine.physical_index(0, 1), Some(7));
        assert_eq!(serpentine.physical_index(3, 1), Some(4));
        assert_eq!(serpentine.physical_index(0, 2), Some(8));

        // A reversed serpentine starts its first row backwards
        let flipped = serpentine.with_x_reversed();
        assert_eq!(flipped.physical_index(0, 0), Some(3));
        assert_eq!(flipped.physical_index(0, 1), Some(4));
    }

    #[test]
    fn test_validate() {
        assert_eq!(Topology::new(13, 18).validate(234), Ok(()));
        assert_eq!(
            Topology::new(13, 18).validate(100),
            Err(TopologyError::CapacityExceeded {
                required: 234,
                capacity: 100
            })
        );
        assert_eq!(
            Topology::new(0, 18).validate(100),
            Err(TopologyError::EmptyGrid)
        );
        assert_eq!(
            Topology::new(2, 2).with_leds_per_pixel(0).validate(100),
            Err(TopologyError::ZeroLedsPerPixel)
        );
    }

    #[test]
    fn test_led_count_follows_leds_per_pixel() {
        let topology = Topology::new(13, 18).with_leds_per_pixel(2);
        assert_eq!(topology.pixel_count(), 234);
        assert_eq!(topology.led_count(), 468);
    }
}
