// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Property tests for frame encoding over arbitrary field values.

use proptest::prelude::*;
use vx_core::test_support::strategies::arb_value;
use vx_core::StateUpdate;

use super::*;

fn arb_update() -> impl Strategy<Value = StateUpdate> {
    ("[A-Z][a-zA-Z]{0,12}", prop::collection::vec(("[a-z_]{1,8}", arb_value()), 0..5)).prop_map(
        |(tag, fields)| {
            fields
                .into_iter()
                .fold(StateUpdate::new(tag.as_str()), |update, (name, value)| {
                    update.with(name, value)
                })
        },
    )
}

proptest! {
    #[test]
    fn update_frames_survive_framing(update in arb_update()) {
        let frame = Frame::update(update);
        let mut buffer = Vec::new();
        write_frame(&mut buffer, &frame).expect("write");
        let decoded = read_frame(&mut std::io::Cursor::new(buffer)).expect("read");
        prop_assert_eq!(decoded, frame);
    }

    #[test]
    fn field_order_is_preserved(update in arb_update()) {
        let encoded = encode(&Frame::update(update.clone())).expect("encode");
        let Frame::Update { update: decoded } = decode::<Frame>(&encoded).expect("decode") else {
            return Err(TestCaseError::fail("expected update frame"));
        };
        let before: Vec<_> = update.fields.keys().collect();
        let after: Vec<_> = decoded.fields.keys().collect();
        prop_assert_eq!(before, after);
    }
}
