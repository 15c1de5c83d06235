use consoler::Application;

fn main() {
    let dispatcher = Application::new("jobs")
        .description("Manage the job queue.")
        .command("add", "name [--priority=|-p=] -- queue a job", |matches| {
            let name = matches.value("name").unwrap_or_default();

            match matches.value("priority") {
                Some(priority) => println!("Queued '{name}' at priority {priority}."),
                None => println!("Queued '{name}'."),
            }
        })
        .command("remove", "[-f|--force] name -- remove a job", |matches| {
            let name = matches.value("name").unwrap_or_default();
            let forced = matches.count("f").unwrap_or_default() > 0;
            println!("Removed '{name}' (forced: {forced}).");
        })
        .sub_application("worker", |worker| {
            worker
                .command("start", "[-v] [count] -- start workers", |matches| {
                    let count = matches.value("count").unwrap_or("1");
                    let verbosity = matches.count("v").unwrap_or_default();
                    println!("Starting {count} worker(s) (verbosity: {verbosity}).");
                })
                .command("stop", "-- stop all workers", |_| {
                    println!("Stopping all workers.");
                })
        })
        .build();

    dispatcher.run();
}
