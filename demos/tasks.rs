//! Task list with loading/error flags and memoized selectors
//!
//! The "server" is a JSON document decoded up front plus a vector of
//! tasks; request/response pairs are dispatched by hand where an effects
//! layer would normally sit.

use serde::Deserialize;
use statehouse::{Action, Selector, Store, StoreError, INIT_ACTION_TYPE};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

#[derive(Clone, Debug, Deserialize, PartialEq)]
struct Task {
    id: String,
    title: String,
    #[serde(default)]
    description: String,
    #[serde(default)]
    completed: bool,
}

#[derive(Clone, Debug, PartialEq)]
struct CreateTaskRequest {
    title: String,
    description: String,
}

#[derive(Clone, Debug, Default, PartialEq)]
struct UpdateTaskRequest {
    id: String,
    title: Option<String>,
    description: Option<String>,
    completed: Option<bool>,
}

#[derive(Clone, Debug, Default)]
struct TaskState {
    tasks: Vec<Task>,
    loading: bool,
    error: Option<String>,
}

#[derive(Debug)]
enum TaskAction {
    Init,
    LoadTasks,
    LoadTasksSuccess(Vec<Task>),
    LoadTasksFailure(String),
    AddTask(CreateTaskRequest),
    AddTaskSuccess(Task),
    AddTaskFailure(String),
    UpdateTask(UpdateTaskRequest),
    UpdateTaskSuccess(Task),
    UpdateTaskFailure(String),
    DeleteTask(String),
    DeleteTaskSuccess(String),
    DeleteTaskFailure(String),
    ToggleTaskCompletion(String),
}

impl Action for TaskAction {
    fn init() -> Self {
        TaskAction::Init
    }

    fn kind(&self) -> &str {
        match self {
            TaskAction::Init => INIT_ACTION_TYPE,
            TaskAction::LoadTasks => "[Task] Load Tasks",
            TaskAction::LoadTasksSuccess(_) => "[Task] Load Tasks Success",
            TaskAction::LoadTasksFailure(_) => "[Task] Load Tasks Failure",
            TaskAction::AddTask(_) => "[Task] Add Task",
            TaskAction::AddTaskSuccess(_) => "[Task] Add Task Success",
            TaskAction::AddTaskFailure(_) => "[Task] Add Task Failure",
            TaskAction::UpdateTask(_) => "[Task] Update Task",
            TaskAction::UpdateTaskSuccess(_) => "[Task] Update Task Success",
            TaskAction::UpdateTaskFailure(_) => "[Task] Update Task Failure",
            TaskAction::DeleteTask(_) => "[Task] Delete Task",
            TaskAction::DeleteTaskSuccess(_) => "[Task] Delete Task Success",
            TaskAction::DeleteTaskFailure(_) => "[Task] Delete Task Failure",
            TaskAction::ToggleTaskCompletion(_) => "[Task] Toggle Task Completion",
        }
    }
}

fn with(state: &TaskState, f: impl FnOnce(&mut TaskState)) -> Arc<TaskState> {
    let mut next = state.clone();
    f(&mut next);
    Arc::new(next)
}

/// Every request starts loading and clears the error, every success stops
/// loading and clears it, every failure stops loading and records it.
fn task_reducer(state: Option<Arc<TaskState>>, action: &TaskAction) -> Arc<TaskState> {
    let state = state.unwrap_or_default();
    let settle = |s: &mut TaskState, error: Option<&String>| {
        s.loading = false;
        s.error = error.cloned();
    };

    match action {
        TaskAction::LoadTasks
        | TaskAction::AddTask(_)
        | TaskAction::UpdateTask(_)
        | TaskAction::DeleteTask(_) => with(&state, |s| {
            s.loading = true;
            s.error = None;
        }),
        TaskAction::LoadTasksSuccess(tasks) => with(&state, |s| {
            s.tasks = tasks.clone();
            settle(s, None);
        }),
        TaskAction::AddTaskSuccess(task) => with(&state, |s| {
            s.tasks.push(task.clone());
            settle(s, None);
        }),
        TaskAction::UpdateTaskSuccess(task) => with(&state, |s| {
            for existing in s.tasks.iter_mut().filter(|t| t.id == task.id) {
                *existing = task.clone();
            }
            settle(s, None);
        }),
        TaskAction::DeleteTaskSuccess(id) => with(&state, |s| {
            s.tasks.retain(|t| &t.id != id);
            settle(s, None);
        }),
        TaskAction::LoadTasksFailure(error)
        | TaskAction::AddTaskFailure(error)
        | TaskAction::UpdateTaskFailure(error)
        | TaskAction::DeleteTaskFailure(error) => with(&state, |s| settle(s, Some(error))),
        // Leaves the loading and error flags alone.
        TaskAction::ToggleTaskCompletion(id) => with(&state, |s| {
            for task in s.tasks.iter_mut().filter(|t| &t.id == id) {
                task.completed = !task.completed;
            }
        }),
        TaskAction::Init => state,
    }
}

fn select_all_tasks() -> Selector<TaskState, Vec<Task>> {
    Selector::new(|s: &TaskState| s.tasks.clone())
}

fn select_task_by_id(id: impl Into<String>) -> Selector<TaskState, Option<Task>> {
    let id = id.into();
    Selector::new(move |s: &TaskState| s.tasks.iter().find(|t| t.id == id).cloned())
}

/// In-memory stand-in for the task API.
struct MockServer {
    tasks: Vec<Task>,
    next_id: usize,
}

const SERVER_TASKS: &str = r#"[
    {
        "id": "1",
        "title": "Learn reducers",
        "description": "Pure functions only",
        "completed": true
    },
    { "id": "2", "title": "Write selectors" },
    { "id": "3", "title": "Ship it", "description": "Eventually" }
]"#;

impl MockServer {
    fn new() -> Result<Self, serde_json::Error> {
        let tasks: Vec<Task> = serde_json::from_str(SERVER_TASKS)?;
        let next_id = tasks.len() + 1;
        Ok(Self { tasks, next_id })
    }

    fn create(&mut self, request: &CreateTaskRequest) -> Task {
        let task = Task {
            id: self.next_id.to_string(),
            title: request.title.clone(),
            description: request.description.clone(),
            completed: false,
        };
        self.next_id += 1;
        self.tasks.push(task.clone());
        task
    }

    fn update(&mut self, request: &UpdateTaskRequest) -> Result<Task, String> {
        let task = self
            .tasks
            .iter_mut()
            .find(|t| t.id == request.id)
            .ok_or_else(|| format!("task {} not found", request.id))?;
        if let Some(title) = &request.title {
            task.title = title.clone();
        }
        if let Some(description) = &request.description {
            task.description = description.clone();
        }
        if let Some(completed) = request.completed {
            task.completed = completed;
        }
        Ok(task.clone())
    }

    fn delete(&mut self, id: &str) -> Result<(), String> {
        let before = self.tasks.len();
        self.tasks.retain(|t| t.id != id);
        if self.tasks.len() == before {
            return Err(format!("task {id} not found"));
        }
        Ok(())
    }
}

fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    println!("=== Task List ===\n");

    let mut server = MockServer::new()?;
    let store = Store::builder().name("tasks").reducer(task_reducer).build()?;

    let all = select_all_tasks();
    let completed = all.map(|tasks| tasks.iter().filter(|t| t.completed).count());
    let pending = all.map(|tasks| tasks.iter().filter(|t| !t.completed).count());

    let view = store.clone();
    let (completed_view, pending_view) = (completed.clone(), pending.clone());
    let renders = Arc::new(AtomicUsize::new(0));
    let renders_view = renders.clone();
    let subscription = store.subscribe(move || {
        let state = view.get_state();
        renders_view.fetch_add(1, Ordering::SeqCst);
        println!(
            "   [render] {} tasks, {} done, {} pending, loading: {}, error: {:?}",
            state.tasks.len(),
            completed_view.select(&state),
            pending_view.select(&state),
            state.loading,
            state.error,
        );
    });

    println!("1. Loading tasks");
    store.dispatch(TaskAction::LoadTasks)?;
    store.dispatch(TaskAction::LoadTasksSuccess(server.tasks.clone()))?;

    println!("\n2. Adding a task");
    let request = CreateTaskRequest {
        title: "Celebrate".to_string(),
        description: "Cake".to_string(),
    };
    store.dispatch(TaskAction::AddTask(request.clone()))?;
    store.dispatch(TaskAction::AddTaskSuccess(server.create(&request)))?;

    println!("\n3. Toggling, updating and deleting");
    store.dispatch(TaskAction::ToggleTaskCompletion("2".to_string()))?;
    let request = UpdateTaskRequest {
        id: "3".to_string(),
        title: Some("Ship it today".to_string()),
        ..Default::default()
    };
    store.dispatch(TaskAction::UpdateTask(request.clone()))?;
    match server.update(&request) {
        Ok(task) => store.dispatch(TaskAction::UpdateTaskSuccess(task))?,
        Err(error) => store.dispatch(TaskAction::UpdateTaskFailure(error))?,
    }
    for id in ["1", "missing"] {
        store.dispatch(TaskAction::DeleteTask(id.to_string()))?;
        match server.delete(id) {
            Ok(()) => store.dispatch(TaskAction::DeleteTaskSuccess(id.to_string()))?,
            Err(error) => store.dispatch(TaskAction::DeleteTaskFailure(error))?,
        }
    }

    println!("\n4. A failed reload, then a successful one");
    store.dispatch(TaskAction::LoadTasks)?;
    store.dispatch(TaskAction::LoadTasksFailure("server unavailable".to_string()))?;
    store.dispatch(TaskAction::LoadTasks)?;
    store.dispatch(TaskAction::LoadTasksSuccess(server.tasks.clone()))?;

    println!("\nRemaining tasks:");
    for task in &store.get_state().tasks {
        let mark = if task.completed { "x" } else { " " };
        println!("   [{mark}] {}: {}", task.title, task.description);
    }
    if let Some(task) = store.select(&select_task_by_id("3")) {
        println!("Task 3 is now {:?}", task.title);
    }

    println!(
        "\n{} renders, task list projected {} times, done count {} times",
        renders.load(Ordering::SeqCst),
        all.recomputations(),
        completed.recomputations()
    );
    subscription.unsubscribe();

    let missing = Store::<TaskState, TaskAction>::builder().build();
    if let Err(err @ StoreError::Configuration) = missing {
        println!("Building without a reducer fails: {err}");
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn task(id: &str, completed: bool) -> Task {
        Task {
            id: id.to_string(),
            title: format!("task {id}"),
            description: String::new(),
            completed,
        }
    }

    fn loaded() -> Store<TaskState, TaskAction> {
        let store = Store::create(task_reducer).unwrap();
        store
            .dispatch(TaskAction::LoadTasksSuccess(vec![task("1", false), task("2", true)]))
            .unwrap();
        store
    }

    #[test]
    fn requests_start_loading_and_clear_error() {
        for request in [
            TaskAction::LoadTasks,
            TaskAction::AddTask(CreateTaskRequest {
                title: "new".to_string(),
                description: String::new(),
            }),
            TaskAction::UpdateTask(UpdateTaskRequest {
                id: "1".to_string(),
                ..Default::default()
            }),
            TaskAction::DeleteTask("1".to_string()),
        ] {
            let store = loaded();
            store
                .dispatch(TaskAction::LoadTasksFailure("down".to_string()))
                .unwrap();

            store.dispatch(request).unwrap();

            let state = store.get_state();
            assert!(state.loading);
            assert_eq!(state.error, None);
        }
    }

    #[test]
    fn successes_stop_loading_and_clear_error() {
        let successes = [
            TaskAction::AddTaskSuccess(task("3", false)),
            TaskAction::UpdateTaskSuccess(task("1", true)),
            TaskAction::DeleteTaskSuccess("2".to_string()),
            TaskAction::LoadTasksSuccess(vec![]),
        ];
        for success in successes {
            let store = loaded();
            store.dispatch(TaskAction::LoadTasks).unwrap();
            store
                .dispatch(TaskAction::LoadTasksFailure("stale".to_string()))
                .unwrap();
            store.dispatch(TaskAction::LoadTasks).unwrap();

            store.dispatch(success).unwrap();

            let state = store.get_state();
            assert!(!state.loading);
            assert_eq!(state.error, None);
        }
    }

    #[test]
    fn failures_stop_loading_and_record_error() {
        let failures = [
            TaskAction::LoadTasksFailure("load".to_string()),
            TaskAction::AddTaskFailure("add".to_string()),
            TaskAction::UpdateTaskFailure("update".to_string()),
            TaskAction::DeleteTaskFailure("delete".to_string()),
        ];
        for failure in failures {
            let store = loaded();
            store.dispatch(TaskAction::LoadTasks).unwrap();
            let expected = match &failure {
                TaskAction::LoadTasksFailure(e)
                | TaskAction::AddTaskFailure(e)
                | TaskAction::UpdateTaskFailure(e)
                | TaskAction::DeleteTaskFailure(e) => e.clone(),
                _ => unreachable!(),
            };

            store.dispatch(failure).unwrap();

            let state = store.get_state();
            assert!(!state.loading);
            assert_eq!(state.error, Some(expected));
            assert_eq!(state.tasks.len(), 2);
        }
    }

    #[test]
    fn task_list_changes() {
        let store = loaded();

        store.dispatch(TaskAction::AddTaskSuccess(task("3", false))).unwrap();
        store
            .dispatch(TaskAction::UpdateTaskSuccess(Task {
                title: "renamed".to_string(),
                ..task("1", false)
            }))
            .unwrap();
        store.dispatch(TaskAction::DeleteTaskSuccess("2".to_string())).unwrap();
        store.dispatch(TaskAction::ToggleTaskCompletion("3".to_string())).unwrap();

        let state = store.get_state();
        let summary: Vec<_> = state
            .tasks
            .iter()
            .map(|t| (t.id.as_str(), t.title.as_str(), t.completed))
            .collect();
        assert_eq!(summary, vec![("1", "renamed", false), ("3", "task 3", true)]);
    }

    #[test]
    fn toggle_keeps_flags() {
        let store = loaded();
        store
            .dispatch(TaskAction::LoadTasksFailure("down".to_string()))
            .unwrap();

        store.dispatch(TaskAction::ToggleTaskCompletion("1".to_string())).unwrap();

        let state = store.get_state();
        assert!(state.tasks[0].completed);
        assert_eq!(state.error.as_deref(), Some("down"));
    }

    #[test]
    fn select_by_id() {
        let store = loaded();
        let second = select_task_by_id("2");
        let missing = select_task_by_id("9");

        assert_eq!(store.select(&second), Some(task("2", true)));
        assert_eq!(store.select(&missing), None);
    }

    #[test]
    fn mock_server_round_trip() {
        let mut server = MockServer::new().unwrap();
        assert_eq!(server.tasks.len(), 3);

        let created = server.create(&CreateTaskRequest {
            title: "new".to_string(),
            description: "desc".to_string(),
        });
        assert_eq!(created.id, "4");

        let updated = server
            .update(&UpdateTaskRequest {
                id: "4".to_string(),
                completed: Some(true),
                ..Default::default()
            })
            .unwrap();
        assert!(updated.completed);
        assert!(server.delete("4").is_ok());
        assert!(server.delete("4").is_err());
        assert!(server
            .update(&UpdateTaskRequest {
                id: "4".to_string(),
                ..Default::default()
            })
            .is_err());
    }
}
