use std::sync::Arc;
use std::time::Duration;

use teloxide::prelude::*;
use teloxide::types::{ChatAction, KeyboardRemove, ParseMode, User};
use tokio::time::sleep;

use crate::bot::state::SessionStore;
use crate::bot::ui;
use crate::config::Config;
use crate::order::flow::{self, ConversationSession, OrderStep, StepOutcome};
use crate::order::service::{self, OrderService};
use crate::order::types::{OrderRecord, OrderType};

// A typing indicator runs briefly before the menu appears, and the menu
// comes back a moment after a completed order.
const MENU_TYPING_DELAY_MS: u64 = 800;
const MENU_REDISPLAY_DELAY_MS: u64 = 1000;

pub async fn send_main_menu(bot: &Bot, chat_id: ChatId) -> Result<(), anyhow::Error> {
    bot.send_chat_action(chat_id, ChatAction::Typing).await?;
    sleep(Duration::from_millis(MENU_TYPING_DELAY_MS)).await;
    bot.send_message(chat_id, ui::WELCOME)
        .parse_mode(ParseMode::Markdown)
        .reply_markup(ui::main_menu_keyboard())
        .await?;
    Ok(())
}

/// The main text-message handler: top-level menu labels and escape actions
/// first, then whatever step the user's session is on. Text from a user
/// with no session and no recognized label is silently ignored.
pub async fn message_handler(
    bot: Bot,
    msg: Message,
    cfg: Arc<Config>,
    sessions: Arc<SessionStore>,
    service: Arc<OrderService>,
) -> Result<(), anyhow::Error> {
    let (user, text) = match (msg.from.clone(), msg.text()) {
        (Some(user), Some(text)) => (user, text.to_string()),
        _ => return Ok(()),
    };
    let chat_id = msg.chat.id;

    // Events from the same user are handled strictly one at a time.
    let lock = sessions.user_lock(user.id).await;
    let _guard = lock.lock().await;

    match text.as_str() {
        ui::MENU_APP_ORDER => {
            start_order(&bot, chat_id, &user, OrderType::App, &cfg, &sessions, &service).await
        }
        ui::MENU_WEBSITE_ORDER => {
            start_order(&bot, chat_id, &user, OrderType::Website, &cfg, &sessions, &service).await
        }
        ui::MENU_PROMOTE => {
            start_order(&bot, chat_id, &user, OrderType::Promotion, &cfg, &sessions, &service).await
        }
        ui::MENU_ORDER_HISTORY => show_order_history(&bot, chat_id, &user, &service).await,
        ui::LABEL_CANCEL => cancel_order(&bot, chat_id, &user, &sessions).await,
        ui::LABEL_BACK => go_back(&bot, chat_id, &user, &sessions).await,
        _ => {
            handle_session_input(&bot, chat_id, &user, &text, &cfg, &sessions, &service).await
        }
    }
}

/// Creates a fresh session for the chosen category. Any in-flight session
/// for the user is silently replaced.
async fn start_order(
    bot: &Bot,
    chat_id: ChatId,
    user: &User,
    order_type: OrderType,
    cfg: &Config,
    sessions: &SessionStore,
    service: &OrderService,
) -> Result<(), anyhow::Error> {
    let session = ConversationSession::new(order_type, &cfg.flow);
    let step = session.step;
    sessions.set(user.id, session).await;
    log::info!(
        "User {} started a {} flow",
        user.id,
        order_type.label()
    );

    bot.send_message(chat_id, ui::step_prompt(step, order_type, service.catalog(), cfg))
        .parse_mode(ParseMode::Markdown)
        .reply_markup(ui::step_keyboard(step, order_type, service.catalog(), &cfg.flow))
        .await?;
    Ok(())
}

async fn cancel_order(
    bot: &Bot,
    chat_id: ChatId,
    user: &User,
    sessions: &SessionStore,
) -> Result<(), anyhow::Error> {
    sessions.remove(user.id).await;
    bot.send_message(chat_id, ui::ORDER_CANCELLED)
        .reply_markup(KeyboardRemove::new())
        .await?;
    send_main_menu(bot, chat_id).await
}

/// "Back" resets the whole session and returns to the main menu. It has
/// never stepped back a single prompt.
async fn go_back(
    bot: &Bot,
    chat_id: ChatId,
    user: &User,
    sessions: &SessionStore,
) -> Result<(), anyhow::Error> {
    sessions.remove(user.id).await;
    send_main_menu(bot, chat_id).await
}

async fn show_order_history(
    bot: &Bot,
    chat_id: ChatId,
    user: &User,
    service: &OrderService,
) -> Result<(), anyhow::Error> {
    match service.history(user.id.0) {
        Ok(orders) => {
            bot.send_message(chat_id, service::render_history(&orders))
                .parse_mode(ParseMode::Markdown)
                .await?;
        }
        Err(e) => {
            log::error!("Failed to load order history for user {}: {}", user.id, e);
            bot.send_message(chat_id, ui::HISTORY_FAILED).await?;
        }
    }
    Ok(())
}

async fn handle_session_input(
    bot: &Bot,
    chat_id: ChatId,
    user: &User,
    text: &str,
    cfg: &Config,
    sessions: &SessionStore,
    service: &OrderService,
) -> Result<(), anyhow::Error> {
    let Some(mut session) = sessions.get(user.id).await else {
        return Ok(());
    };

    if session.is_expired(cfg.flow.idle_timeout_secs) {
        log::info!("Dropping expired session for user {}", user.id);
        sessions.remove(user.id).await;
        bot.send_message(chat_id, ui::SESSION_EXPIRED)
            .reply_markup(KeyboardRemove::new())
            .await?;
        return send_main_menu(bot, chat_id).await;
    }

    match flow::apply(&mut session, text, &cfg.flow, service.catalog()) {
        StepOutcome::Reprompt(error) => {
            sessions.set(user.id, session).await;
            bot.send_message(chat_id, error.to_string())
                .parse_mode(ParseMode::Markdown)
                .await?;
        }
        StepOutcome::Advance => {
            let step = session.step;
            let order_type = session.order_type;
            sessions.set(user.id, session).await;

            bot.send_message(chat_id, ui::step_prompt(step, order_type, service.catalog(), cfg))
                .parse_mode(ParseMode::Markdown)
                .reply_markup(ui::step_keyboard(step, order_type, service.catalog(), &cfg.flow))
                .await?;
            if step == OrderStep::SelectingPaymentMethod {
                bot.send_message(chat_id, ui::payment_numbers_text(&cfg.payments))
                    .parse_mode(ParseMode::Markdown)
                    .await?;
            }
        }
        StepOutcome::Complete => {
            // The stored session still holds the pre-completion step; it is
            // only removed once the order is durably saved, so a failed save
            // can be retried by repeating the same input.
            finalize_order(bot, chat_id, user, cfg, sessions, service, session).await?;
        }
    }
    Ok(())
}

/// The terminal transaction: persist, confirm to the user, notify the
/// administrator, drop the session, re-show the menu. Strictly in that
/// order; a failed save aborts everything after it.
async fn finalize_order(
    bot: &Bot,
    chat_id: ChatId,
    user: &User,
    cfg: &Config,
    sessions: &SessionStore,
    service: &OrderService,
    session: ConversationSession,
) -> Result<(), anyhow::Error> {
    let Some(record) = OrderRecord::from_session(user.id.0, &session) else {
        log::error!(
            "Completed session for user {} is missing required fields; dropping it",
            user.id
        );
        sessions.remove(user.id).await;
        return Ok(());
    };

    if let Err(e) = service.record_order(&record) {
        log::error!("Failed to save order for user {}: {}", user.id, e);
        bot.send_message(chat_id, ui::ORDER_SAVE_FAILED).await?;
        return Ok(());
    }

    bot.send_message(chat_id, ui::ORDER_CONFIRMED)
        .parse_mode(ParseMode::Markdown)
        .reply_markup(KeyboardRemove::new())
        .await?;

    // The order is already saved; a failed notification must not roll back
    // the user-visible confirmation.
    if let Err(e) = bot
        .send_message(ChatId(cfg.telegram.admin_id), ui::admin_summary(&record))
        .parse_mode(ParseMode::Markdown)
        .await
    {
        log::error!(
            "Failed to notify admin about order from user {}: {}",
            user.id,
            e
        );
    }

    sessions.remove(user.id).await;

    sleep(Duration::from_millis(MENU_REDISPLAY_DELAY_MS)).await;
    send_main_menu(bot, chat_id).await
}
