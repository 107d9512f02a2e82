//! Counter driven through a store, with a listener re-rendering on change

use statehouse::{Action, Store, INIT_ACTION_TYPE};
use std::sync::Arc;

#[derive(Debug)]
enum CounterAction {
    Init,
    Increment,
    Decrement,
    Reset,
}

impl Action for CounterAction {
    fn init() -> Self {
        CounterAction::Init
    }

    fn kind(&self) -> &str {
        match self {
            CounterAction::Init => INIT_ACTION_TYPE,
            CounterAction::Increment => "INCREMENT",
            CounterAction::Decrement => "DECREMENT",
            CounterAction::Reset => "RESET",
        }
    }
}

#[derive(Debug, Default)]
struct CounterState {
    count: i32,
}

fn counter_reducer(state: Option<Arc<CounterState>>, action: &CounterAction) -> Arc<CounterState> {
    let state = state.unwrap_or_default();
    match action {
        CounterAction::Increment => Arc::new(CounterState {
            count: state.count + 1,
        }),
        CounterAction::Decrement => Arc::new(CounterState {
            count: state.count - 1,
        }),
        CounterAction::Reset if state.count != 0 => Arc::new(CounterState::default()),
        _ => state,
    }
}

fn main() -> Result<(), statehouse::StoreError> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    println!("=== Counter ===\n");

    let store = Store::builder()
        .name("counter")
        .reducer(counter_reducer)
        .build()?;
    println!("1. Initial state: {}", store.get_state().count);

    let view = store.clone();
    store.subscribe(move || {
        println!("   [render] count = {}", view.get_state().count);
    });

    println!("\n2. Dispatching INCREMENT twice and DECREMENT once");
    store.dispatch(CounterAction::Increment)?;
    store.dispatch(CounterAction::Increment)?;
    store.dispatch(CounterAction::Decrement)?;

    println!("\n3. RESET renders once, a second RESET changes nothing");
    store.dispatch(CounterAction::Reset)?;
    store.dispatch(CounterAction::Reset)?;

    println!("\nFinal state: {:?}", store.get_state());
    Ok(())
}
