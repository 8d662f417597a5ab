pub mod builders;
pub mod criteria;
pub mod joins;
pub mod operands;
pub mod operators;
pub mod order;
pub mod query;
pub mod statement;
pub mod values;

pub use self::criteria::{Criterion, InValues, SubQuery};
pub use self::joins::Join;
pub use self::operands::{Aggregate, Column, Operand, SelectItem, Selectable, Table};
pub use self::operators::{AppendRule, JoinType};
pub use self::order::Order;
pub use self::query::{Insert, InsertFromSelect, Query, Row};
pub use self::statement::{Expression, Statement};
pub use self::values::{Binding, Bindings, Value};
