use super::{BuildContext, CommandSpec, Stage};

pub(super) fn build(ctx: &BuildContext<'_>, keyname: &str) -> CommandSpec {
    let command = ctx.command().flag("--keyname", keyname);
    let command = match ctx.stage {
        Stage::RunInitialization => command.switch("--eraseLog"),
        _ => command,
    };
    command.settings_file(ctx.options).build()
}
