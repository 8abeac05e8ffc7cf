mod tests {
    use myrtio_torch_composer::command::{
        CommandChannel, CommandError, ControlCommand, MAX_PARAMS_LEN, TrySendError,
    };
    use myrtio_torch_composer::config::DisplayMode;
    use myrtio_torch_composer::device::DeviceRequest;
    use myrtio_torch_composer::text::MAX_MESSAGE_LEN;

    #[test]
    fn test_commands_arrive_in_order() {
        let channel = CommandChannel::<4>::new();
        let sender = channel.sender();
        let receiver = channel.receiver();

        sender.send_params("brightness=10").unwrap();
        sender.send_mode(DisplayMode::Lamp).unwrap();
        sender.send_message(b"hello").unwrap();
        assert_eq!(channel.len(), 3);

        match receiver.try_receive() {
            Some(ControlCommand::Params(text)) => assert_eq!(text.as_str(), "brightness=10"),
            other => panic!("unexpected {other:?}"),
        }
        assert_eq!(
            receiver.try_receive(),
            Some(ControlCommand::Mode(DisplayMode::Lamp))
        );
        match receiver.try_receive() {
            Some(ControlCommand::Message(bytes)) => assert_eq!(bytes.as_slice(), b"hello"),
            other => panic!("unexpected {other:?}"),
        }
        assert_eq!(receiver.try_receive(), None);
        assert!(channel.is_empty());
    }

    #[test]
    fn test_full_queue_hands_command_back() {
        let channel = CommandChannel::<2>::new();
        let sender = channel.sender();
        sender.send_mode(DisplayMode::Off).unwrap();
        sender.send_mode(DisplayMode::Torch).unwrap();

        let rejected = ControlCommand::Device(DeviceRequest::SetOutput(3));
        assert_eq!(
            sender.try_send(rejected.clone()),
            Err(TrySendError(rejected))
        );
        assert_eq!(
            sender.send_mode(DisplayMode::Lamp),
            Err(CommandError::QueueFull)
        );

        channel.receiver().try_receive();
        assert!(sender.send_device(DeviceRequest::SetOutput(3)).is_ok());
    }

    #[test]
    fn test_oversized_input_is_rejected() {
        let channel = CommandChannel::<2>::new();
        let sender = channel.sender();

        let params = "x".repeat(MAX_PARAMS_LEN + 1);
        assert_eq!(
            sender.send_params(&params),
            Err(CommandError::TooLong {
                len: MAX_PARAMS_LEN + 1,
                capacity: MAX_PARAMS_LEN
            })
        );
        let message = vec![b'x'; MAX_MESSAGE_LEN + 1];
        assert!(matches!(
            sender.send_message(&message),
            Err(CommandError::TooLong { .. })
        ));
        assert!(channel.is_empty());
    }

    #[test]
    fn test_senders_share_one_queue() {
        let channel = CommandChannel::<8>::new();
        let first = channel.sender();
        let second = channel.sender();
        std::thread::scope(|scope| {
            scope.spawn(|| {
                for _ in 0..3 {
                    first.send_mode(DisplayMode::Off).unwrap();
                }
            });
            scope.spawn(|| {
                for _ in 0..3 {
                    second.send_mode(DisplayMode::Lamp).unwrap();
                }
            });
        });
        assert_eq!(channel.len(), 6);
    }

    #[test]
    fn test_error_messages() {
        assert_eq!(
            CommandError::TooLong {
                len: 300,
                capacity: 256
            }
            .to_string(),
            "command input of 300 bytes exceeds capacity 256"
        );
        assert_eq!(CommandError::QueueFull.to_string(), "command queue is full");
    }
}
