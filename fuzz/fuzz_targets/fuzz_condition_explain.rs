#![no_main]

use libfuzzer_sys::fuzz_target;
use shardline_explain::{ExplainOptions, Explainer, ShardingSchema};
use shardline_routing::{BindVariables, ScalarKind};

fuzz_target!(|data: &[u8]| {
    let Ok(condition) = std::str::from_utf8(data) else {
        return;
    };

    let schema = ShardingSchema::new()
        .column("orders", "user_id", ScalarKind::Signed)
        .column("orders", "region", ScalarKind::Text);
    let explainer = Explainer::new(schema, ExplainOptions::default());

    // Explain and replay must only ever return errors, never panic.
    let sql = format!("SELECT * FROM orders WHERE {condition}");
    if let Ok(explained) = explainer.explain(&sql) {
        let binds = (0..explained.positional_params)
            .fold(BindVariables::new(), |binds, i| binds.with(i as i64));
        let first = explained.log.redo(&binds);
        let second = explained.log.redo(&binds);
        assert_eq!(first, second, "replay must be deterministic");
    }
});
