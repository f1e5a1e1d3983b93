//! CLI command implementations.

mod publish;
mod update;

pub(crate) use publish::PublishArgs;
pub(crate) use update::UpdateArgs;
