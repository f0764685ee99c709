mod config;
mod echo;
mod init_logging;

use anyhow::Context;

#[cfg(unix)]
fn drop_root(user: nix::unistd::User) -> anyhow::Result<()> {
    log::debug!(
        "Dropping root privileges to UID {}, GID {}",
        user.uid,
        user.gid
    );
    nix::unistd::setgroups(&[]).context("setgroups failed")?;
    nix::unistd::setgid(user.gid).context("setgid failed")?;
    nix::unistd::setuid(user.uid).context("setuid failed")?;
    Ok(())
}

#[cfg(unix)]
fn switch_user(user: &str) -> anyhow::Result<()> {
    let context = || format!("Failed to get user info for user '{user}'");
    let user = nix::unistd::User::from_name(user)
        .with_context(context)?
        .with_context(context)?;
    if nix::unistd::Uid::effective().is_root() && !user.uid.is_root() {
        drop_root(user).context("drop_root failed")?;
    }
    Ok(())
}

#[cfg(not(unix))]
fn switch_user(user: &str) -> anyhow::Result<()> {
    log::warn!("Ignoring user '{user}': switching users is only supported on unix");
    Ok(())
}

fn main() -> anyhow::Result<()> {
    use config::parse_config;

    let config = parse_config().context("Failed to parse config")?;
    init_logging::init_logging(&config)?;
    log::debug!("{config:?}");
    log::debug!("Native address layout: {:?}", udp_shim::Platform::current());

    let server = echo::EchoServer::bind(config.local_address)?;

    if let Some(user) = &config.user {
        switch_user(user)?;
    }

    log::info!("Echo server bound to {}/udp", server.get_local_address());

    server.run()?;

    Ok(())
}
