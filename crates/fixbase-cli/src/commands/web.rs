use anyhow::Result;
use fixbase_core::KnowledgeBase;

use crate::cli::WebArgs;

/// The knowledge base is composed before the server runtime starts.
pub(super) fn serve(kb: KnowledgeBase, args: &WebArgs) -> Result<()> {
    fixbase_web::serve_web(kb, &args.host, args.port)
}
