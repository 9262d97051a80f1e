use teloxide::{prelude::*, utils::command::BotCommands};

use crate::bot::message::send_main_menu;

#[derive(BotCommands, Clone)]
#[command(
    rename_rule = "lowercase",
    description = "These commands are supported:"
)]
pub enum Command {
    #[command(description = "Show the main menu.")]
    Start,
}

pub async fn command_handler(bot: Bot, msg: Message, cmd: Command) -> Result<(), anyhow::Error> {
    match cmd {
        Command::Start => send_main_menu(&bot, msg.chat.id).await,
    }
}
