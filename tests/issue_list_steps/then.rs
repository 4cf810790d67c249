//! Then steps for issue list BDD scenarios.

use super::world::{ListWorld, run_async};
use eyre::WrapErr;
use rstest_bdd_macros::then;
use todobot::issue::{
    domain::{Issue, ListKind},
    services::{ErrorKind, IssueListError},
};

#[then(r#""{owner}" holds {count:usize} entries in the "{list}" list"#)]
fn list_holds_entries(
    world: &ListWorld,
    owner: String,
    count: usize,
    list: String,
) -> Result<(), eyre::Report> {
    let user = world.user(&owner)?;
    let kind = ListKind::try_from(list.as_str()).wrap_err("parse list name")?;
    let entries = run_async(world.service.issue_list(&user, kind)).wrap_err("fetch list")?;
    if entries.len() != count {
        return Err(eyre::eyre!(
            "expected {count} entries in {owner}'s {kind} list, found {}",
            entries.len()
        ));
    }
    Ok(())
}

#[then(r#"the popped issue says "{message}" and came from "{sender}""#)]
fn popped_from_sender(
    world: &ListWorld,
    message: String,
    sender: String,
) -> Result<(), eyre::Report> {
    let issue = popped(world)?;
    let expected = world.user(&sender)?;
    if issue.message().as_str() != message {
        return Err(eyre::eyre!(
            "expected popped message {message:?}, found {:?}",
            issue.message().as_str()
        ));
    }
    if issue.foreign_user() != Some(&expected) {
        return Err(eyre::eyre!(
            "expected popped issue from {sender}, found {:?}",
            issue.foreign_user()
        ));
    }
    Ok(())
}

#[then(r#"the popped issue says "{message}" and came from nobody"#)]
fn popped_own_issue(world: &ListWorld, message: String) -> Result<(), eyre::Report> {
    let issue = popped(world)?;
    if issue.message().as_str() != message {
        return Err(eyre::eyre!(
            "expected popped message {message:?}, found {:?}",
            issue.message().as_str()
        ));
    }
    if let Some(sender) = issue.foreign_user() {
        return Err(eyre::eyre!("expected an own issue, found one from {sender}"));
    }
    Ok(())
}

#[then("the pop reports an empty list")]
fn pop_reports_empty(world: &ListWorld) -> Result<(), eyre::Report> {
    let result = world
        .last_pop
        .as_ref()
        .ok_or_else(|| eyre::eyre!("missing pop result in scenario world"))?;
    match result {
        Err(err @ IssueListError::EmptyList(_)) if err.kind() == ErrorKind::NotFound => Ok(()),
        other => Err(eyre::eyre!("expected an empty-list error, got {other:?}")),
    }
}

fn popped(world: &ListWorld) -> Result<&Issue, eyre::Report> {
    world
        .last_pop
        .as_ref()
        .ok_or_else(|| eyre::eyre!("missing pop result in scenario world"))?
        .as_ref()
        .map_err(|err| eyre::eyre!("unexpected pop failure: {err}"))
}
