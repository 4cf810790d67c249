//! `/todo` conversations between several users.

use crate::in_memory::helpers::{CommandFixture, command_fixture, runtime, user_id};
use rstest::rstest;
use std::io;
use todobot::issue::{
    adapters::memory::Delivery,
    domain::ListKind,
    services::{CommandOutcome, ErrorKind},
};
use tokio::runtime::Runtime;

/// Tests a send, a list of the tracking view, and the receiver's pop.
#[rstest]
fn round_trip_between_two_users(runtime: io::Result<Runtime>, command_fixture: CommandFixture) {
    let rt = runtime.expect("runtime creation");
    let CommandFixture {
        commands,
        issues,
        notifier,
    } = command_fixture;
    let alice = user_id("alice");
    let carol = user_id("carol");

    rt.block_on(commands.execute(&alice, "/todo send @carol Book the venue"))
        .expect("send");
    let listed = rt
        .block_on(commands.execute(&alice, "/todo list out"))
        .expect("list out");
    let popped = rt
        .block_on(commands.execute(&carol, "/todo pop"))
        .expect("pop");

    assert!(matches!(
        listed,
        CommandOutcome::Listed { kind: ListKind::Out, issues: ref entries } if entries.len() == 1
    ));
    assert!(matches!(
        popped,
        CommandOutcome::Popped { ref issue, .. } if issue.foreign_user() == Some(&alice)
    ));

    let deliveries = notifier.deliveries().expect("deliveries");
    let direct: Vec<_> = deliveries
        .iter()
        .filter_map(|delivery| match delivery {
            Delivery::Direct { recipient, text } => Some((recipient.clone(), text.clone())),
            Delivery::Reply { .. } | Delivery::Refresh { .. } => None,
        })
        .collect();
    assert_eq!(
        direct,
        vec![
            (
                carol.clone(),
                "You have received a new Todo from @alice\n\nBook the venue".to_owned()
            ),
            (
                alice.clone(),
                "@carol popped a Todo you sent: Book the venue".to_owned()
            ),
        ]
    );

    let alice_out = rt
        .block_on(issues.issue_list(&alice, ListKind::Out))
        .expect("alice out");
    assert!(alice_out.is_empty());
}

/// Tests that bad input is reported as a user error and changes nothing.
#[rstest]
#[case("/todo send @alice")]
#[case("/todo list someday")]
#[case("/todo send @mallory hi")]
#[case("/todo add    ")]
fn bad_input_is_a_user_error(
    runtime: io::Result<Runtime>,
    command_fixture: CommandFixture,
    #[case] input: &str,
) {
    let rt = runtime.expect("runtime creation");
    let bob = user_id("bob");

    let err = rt
        .block_on(command_fixture.commands.execute(&bob, input))
        .expect_err("input should be rejected");

    assert_eq!(err.kind(), ErrorKind::User);
    let my = rt
        .block_on(command_fixture.issues.issue_list(&bob, ListKind::My))
        .expect("bob my");
    assert!(my.is_empty());
    assert!(
        command_fixture
            .notifier
            .deliveries()
            .expect("deliveries")
            .is_empty()
    );
}

/// Tests that help is returned for unrecognized subcommands.
#[rstest]
fn unknown_subcommand_shows_help(runtime: io::Result<Runtime>, command_fixture: CommandFixture) {
    let rt = runtime.expect("runtime creation");

    let outcome = rt
        .block_on(command_fixture.commands.execute(&user_id("bob"), "/todo dance"))
        .expect("help");

    assert_eq!(outcome, CommandOutcome::Help);
}
