//! Given steps for issue list BDD scenarios.

use super::world::{ListWorld, run_async};
use eyre::WrapErr;
use rstest_bdd_macros::given;
use todobot::issue::domain::UserId;

#[given(r#"registered users "{first}" and "{second}""#)]
fn registered_users(
    world: &mut ListWorld,
    first: String,
    second: String,
) -> Result<(), eyre::Report> {
    for username in [first, second] {
        let user = UserId::new(format!("id-{username}")).wrap_err("build user id")?;
        world
            .directory
            .register(username, user)
            .wrap_err("register scenario user")?;
    }
    Ok(())
}

#[given(r#""{sender}" has sent "{message}" to "{receiver}""#)]
fn issue_already_sent(
    world: &mut ListWorld,
    sender: String,
    message: String,
    receiver: String,
) -> Result<(), eyre::Report> {
    let from = world.user(&sender)?;
    let to = world.user(&receiver)?;
    run_async(world.service.send_issue(&from, &to, &message, None))
        .wrap_err("send issue for scenario setup")?;
    Ok(())
}

#[given(r#""{owner}" has added "{message}""#)]
fn issue_already_added(
    world: &mut ListWorld,
    owner: String,
    message: String,
) -> Result<(), eyre::Report> {
    let user = world.user(&owner)?;
    run_async(world.service.add_issue(&user, &message, None))
        .wrap_err("add issue for scenario setup")?;
    Ok(())
}
