use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::info;

use crate::client::api::{ClientError, HttpSearchApi};
use crate::client::controller::DebouncedSearch;
use crate::config::ClientArgs;

// Each stdin line replaces the whole input value
pub async fn run(args: ClientArgs) -> Result<(), ClientError> {
    let api = HttpSearchApi::new(&args.server, args.timeout())?;
    info!("Searching against {}", api.endpoint());

    let mut search = DebouncedSearch::new(api, args.debounce());
    let mut updates = search.subscribe();

    println!("{}", search.state().view());
    search.mark_rendered();

    let render = tokio::spawn(async move {
        while updates.changed().await.is_ok() {
            let state = updates.borrow_and_update().clone();
            println!("{}", state.view());
        }
    });

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        search.input(line);
    }

    // let the last query land before exiting
    let last = search.settle().await;

    // stale fetches may still hold the state, don't wait for them
    render.abort();
    let _ = render.await;
    println!("{}", last.view());

    Ok(())
}
