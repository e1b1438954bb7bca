/*!
Request pipeline, one stage per file:
  resolve.rs  : command name -> MethodDescriptor (chain first, then wallet)
  args.rs     : trailing CLI tokens -> string params (`-` reads a stdin line)
  encode.rs   : descriptor + params -> canonical RpcRequest
  render.rs   : raw JSON result -> display text
  list.rs     : `-l` listing of usable commands

Each stage is a plain function returning `Result<_, CtlError>`; control flows
through them once per invocation.
*/

pub mod args;
pub mod encode;
pub mod list;
pub mod render;
pub mod resolve;

pub use args::materialize;
pub use encode::encode;
pub use list::list_commands;
pub use render::render;
pub use resolve::{MethodDescriptor, resolve};
