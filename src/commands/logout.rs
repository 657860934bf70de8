use crate::{
    libs::{config::Config, data_storage::DataStorage, messages::Message, session::SessionContext},
    msg_info, msg_success,
};
use anyhow::Result;

pub fn cmd() -> Result<()> {
    let config = Config::read()?;
    let mut context = SessionContext::load_now(&DataStorage::new(), config.session_settings().total_timeout())?;

    if context.current().is_none() {
        msg_info!(Message::NotSignedIn);
        return Ok(());
    }

    context.clear()?;
    msg_success!(Message::LoggedOut);
    Ok(())
}
