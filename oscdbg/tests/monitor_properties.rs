mod common;

use common::{pkt, RecordingRenderer, ScriptedInput};
use oscdbg::monitor::history::DEFAULT_CAPACITY;
use oscdbg::monitor::{Command, IngestQueue, Session, Viewport};
use proptest::prelude::*;
use std::collections::VecDeque;
use std::sync::Arc;

#[derive(Debug, Clone)]
struct Step {
    deliveries: usize,
    commands: Vec<Command>,
    height: u16,
}

fn command() -> impl Strategy<Value = Command> {
    prop_oneof![
        Just(Command::ToggleHold),
        Just(Command::NavigateUp),
        Just(Command::NavigateDown),
    ]
}

fn step() -> impl Strategy<Value = Step> {
    (0usize..8, prop::collection::vec(command(), 0..4), 0u16..12).prop_map(
        |(deliveries, commands, height)| Step {
            deliveries,
            commands,
            height,
        },
    )
}

proptest! {
    #[test]
    fn history_is_the_accepted_tail(steps in prop::collection::vec(step(), 1..40)) {
        let mut session = Session::new(Arc::new(IngestQueue::new()));
        let mut input = ScriptedInput::new(0);
        let mut renderer = RecordingRenderer::default();

        let mut model: VecDeque<String> = VecDeque::new();
        let mut paused = false;
        let mut capacity = DEFAULT_CAPACITY;
        let mut next = 0usize;

        for step in steps {
            for _ in 0..step.deliveries {
                let address = format!("/p/{}", next);
                next += 1;
                let accepted = session.ingest().deliver(pkt(&address));
                prop_assert_eq!(accepted, !paused);
                if accepted {
                    model.push_back(address);
                }
            }

            input.push(&step.commands);
            input.viewport = Viewport { width: 80, height: step.height };
            session.tick(&mut input, &mut renderer).unwrap();

            while model.len() > capacity {
                model.pop_front();
            }
            for command in &step.commands {
                if *command == Command::ToggleHold {
                    paused = !paused;
                }
            }

            let len = session.history().len();
            prop_assert!(len <= capacity);
            prop_assert!(session.state().selected() < len.max(1));
            prop_assert_eq!(session.state().is_paused(), paused);
            prop_assert_eq!(session.ingest().is_held(), paused);

            let actual: Vec<&str> = session.history().iter().map(|p| p.address.as_str()).collect();
            let expected: Vec<&str> = model.iter().map(String::as_str).collect();
            prop_assert_eq!(actual, expected);

            let frame = renderer.last();
            prop_assert!(frame.visible.end <= len);
            if paused && len > 0 {
                prop_assert!(frame.selected.is_some());
            } else {
                prop_assert!(frame.selected.is_none());
            }

            capacity = usize::from(step.height.saturating_sub(3));
        }
    }
}
