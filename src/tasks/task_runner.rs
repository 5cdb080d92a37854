pub struct TaskRunner {
    tasks: Vec<(String, Box<dyn FnOnce() + Send>)>,
}

impl TaskRunner {
    pub fn new() -> Self {
        Self { tasks: Vec::new() }
    }

    pub fn add_task<F>(&mut self, name: &str, task: F)
    where
        F: FnOnce() + Send + 'static,
    {
        self.tasks.push((name.to_string(), Box::new(task)));
    }

    pub fn start_all(self) {
        for (name, task) in self.tasks {
            println!("Starting background task: {}", name);
            task();
        }
    }
}
