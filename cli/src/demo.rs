//! The demo command tree served by `dispatch-console`.

use command_dispatch_core::{
    ChildCommand, CommandInfo, CommandManager, Completion, Handler, HandlerError, ParameterDescriptor,
    ParameterType, ParentCommand, Result,
};

/// Player names offered when completing `ban player <name>`.
const KNOWN_PLAYERS: &[&str] = &["alex", "notch", "steve"];

/// Registers `ban`, `echo` and `add` on `manager`.
pub fn register(manager: &mut CommandManager) -> Result<()> {
    manager.register_completion(Completion::new(
        "players",
        KNOWN_PLAYERS.iter().map(|name| name.to_string()),
    ));

    manager.register_command(ban())?;
    manager.register_command(echo())?;
    manager.register_command(add())?;
    Ok(())
}

fn ban() -> ParentCommand {
    let ip = ChildCommand::new(
        CommandInfo::new("ip")
            .with_alias("address")
            .with_permission("ban.ip")
            .with_description("Ban an IP address")
            .with_param(ParameterDescriptor::named("address", ParameterType::Token)),
        Handler::new(|args| {
            let address = args.token(0).unwrap_or_default();
            args.issuer().send_message(&format!("Banned address {address}"));
            Ok(())
        }),
    );

    let player = ChildCommand::new(
        CommandInfo::new("player")
            .with_description("Ban a player by name")
            .with_params([
                ParameterDescriptor::named("name", ParameterType::Token).with_completion("players"),
                ParameterDescriptor::named("reason", ParameterType::RawTokens),
            ]),
        Handler::new(|args| {
            let name = args.token(0).unwrap_or_default();
            let reason = args
                .tokens(1)
                .and_then(|tokens| tokens.get(1..))
                .filter(|rest| !rest.is_empty())
                .map(|rest| rest.join(" "));
            let message = match reason {
                Some(reason) => format!("Banned player {name}: {reason}"),
                None => format!("Banned player {name}"),
            };
            args.issuer().send_message(&message);
            Ok(())
        }),
    );

    ParentCommand::new(CommandInfo::new("ban").with_description("Ban players or addresses"))
        .with_child(ip)
        .with_child(player)
}

fn echo() -> ParentCommand {
    ParentCommand::new(
        CommandInfo::new("echo")
            .with_alias("say")
            .with_description("Repeat the given words")
            .with_param(ParameterDescriptor::named("words", ParameterType::RawTokens)),
    )
    .with_handler(Handler::new(|args| {
        let words = args.tokens(0).unwrap_or_default();
        args.issuer().send_message(&words.join(" "));
        Ok(())
    }))
}

fn add() -> ParentCommand {
    ParentCommand::new(
        CommandInfo::new("add")
            .with_description("Add two integers")
            .with_params([
                ParameterDescriptor::named("a", ParameterType::Integer),
                ParameterDescriptor::named("b", ParameterType::Integer),
            ]),
    )
    .with_handler(Handler::new(|args| {
        let (Some(a), Some(b)) = (args.integer(0), args.integer(1)) else {
            return Err(HandlerError::new("add expects two integers"));
        };
        let sum = a
            .checked_add(b)
            .ok_or_else(|| HandlerError::new(format!("{a} + {b} overflows")))?;
        args.issuer().send_message(&sum.to_string());
        Ok(())
    }))
}
