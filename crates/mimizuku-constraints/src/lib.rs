//! クラス制約の収集と spin:constructViolations
//!
//! このクレートはインスタンスとクラスの組に対する制約検証を提供します:
//! - 制約収集 (Collector): クラス自身と全上位クラスの spin:constraint
//! - ルール実行 (Executor): クエリ / テンプレート呼び出しの評価と違反の蓄積
//! - 違反のトリプル化 (Serializer)
//! - 結果行への射影 (Projector)
//! - プロパティ関数 (ConstructViolations)

pub mod collector;
pub mod config;
pub mod engine;
pub mod executor;
pub mod function;
pub mod projector;
pub mod serializer;

// Re-exports
pub use collector::ConstraintCollector;
pub use config::SerializerConfig;
pub use engine::ConstraintEngine;
pub use executor::RuleExecutor;
pub use function::{ConstructViolations, PropFuncArg};
pub use projector::{project, OutputSlots, ResultRows};
pub use serializer::ViolationSerializer;

use mimizuku_core::vocabulary::spin;
use mimizuku_rules::RuleError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConstraintError {
    /// Wrong number of arguments on either side
    #[error("{0}")]
    InputArity(String),

    /// Argument of the wrong kind: a non-resource on the left or a bound slot on the right
    #[error("{0}")]
    InputType(String),

    #[error("{} rule evaluation failed: {0}", spin::construct_violations_qname())]
    RuleEvaluation(#[from] RuleError),
}
