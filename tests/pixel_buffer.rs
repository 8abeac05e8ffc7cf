mod tests {
    use myrtio_torch_composer::color::{Intensity, Rgb};
    use myrtio_torch_composer::pixel_buffer::PixelBuffer;
    use myrtio_torch_composer::topology::{Topology, TopologyError};

    const WHITE: Rgb = Rgb {
        r: 255,
        g: 255,
        b: 255,
    };

    #[test]
    fn test_new_rejects_oversized_topology() {
        let result = PixelBuffer::<16>::new(Topology::new(5, 5));
        assert_eq!(
            result.err(),
            Some(TopologyError::CapacityExceeded {
                required: 25,
                capacity: 16
            })
        );
    }

    #[test]
    fn test_set_and_get_pixel() {
        let mut buffer = PixelBuffer::<32>::new(Topology::new(4, 3)).unwrap();
        assert_eq!(buffer.len(), 12);

        buffer.set_pixel(2, 1, Rgb { r: 255, g: 64, b: 0 });
        assert_eq!(buffer.get_pixel(2, 1), Some(Rgb { r: 255, g: 66, b: 0 }));
        assert_eq!(buffer.as_slice()[6], buffer.pixel_at(2, 1).unwrap());
        assert_eq!(buffer.get_pixel(0, 0), Some(Rgb::default()));
    }

    #[test]
    fn test_writes_land_in_physical_order() {
        let topology = Topology::new(4, 3).with_alternating();
        let mut buffer = PixelBuffer::<12>::new(topology).unwrap();
        buffer.set_pixel(0, 1, WHITE);
        assert!(!buffer.as_slice()[7].is_off());
        assert_eq!(buffer.as_slice().iter().filter(|p| !p.is_off()).count(), 1);
    }

    #[test]
    fn test_out_of_range_is_ignored() {
        let mut buffer = PixelBuffer::<12>::new(Topology::new(4, 3)).unwrap();
        buffer.set_pixel(4, 0, WHITE);
        buffer.set_pixel(0, 3, WHITE);
        buffer.set_pixel_dimmed(100, 100, WHITE, 255);
        assert!(buffer.as_slice().iter().all(|p| p.is_off()));
        assert_eq!(buffer.get_pixel(4, 0), None);
    }

    #[test]
    fn test_dimming_scales_before_quantizing() {
        let mut buffer = PixelBuffer::<12>::new(Topology::new(4, 3)).unwrap();
        buffer.set_pixel_dimmed(0, 0, WHITE, 128);
        let pixel = buffer.pixel_at(0, 0).unwrap();
        // 255 * 128 / 256 = 127, quantized to 15
        assert_eq!(pixel.red().level(), 15);
        assert_eq!(pixel.green().level(), 15);
        assert_eq!(pixel.blue().level(), 15);

        buffer.set_pixel_dimmed(1, 0, WHITE, 0);
        assert!(buffer.pixel_at(1, 0).unwrap().is_off());
    }

    #[test]
    fn test_fill_and_clear() {
        let mut buffer = PixelBuffer::<12>::new(Topology::new(4, 3)).unwrap();
        buffer.fill(Intensity::FULL);
        assert!(buffer.as_slice().iter().all(|p| p.to_rgb() == WHITE));
        buffer.clear();
        assert!(buffer.as_slice().iter().all(|p| p.is_off()));
    }
}
