/// Binary operators, from arithmetic through set operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinOp {
    // Arithmetic
    /// Addition (`+`)
    Add,
    /// Subtraction (`-`)
    Sub,
    /// Multiplication (`*`)
    Mul,
    /// Division (`/`)
    Div,
    /// Modulo (`%`)
    Mod,
    /// Power (`^`)
    Pow,

    // Comparison
    /// Equal (`==`)
    Equal,
    /// Not equal (`!=`)
    NotEqual,
    /// Less than (`<`)
    LessThan,
    /// Greater than (`>`)
    GreaterThan,
    /// Less than or equal (`<=`)
    LessEqual,
    /// Greater than or equal (`>=`)
    GreaterEqual,

    // Set operations between instant vectors
    /// Intersection (`and`)
    And,
    /// Union (`or`)
    Or,
    /// Complement (`unless`)
    Unless,
}

/// Unary operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnaryOp {
    /// Negation (`-`)
    Neg,
    /// Identity (`+`)
    Pos,
}

/// Aggregation operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AggregateOp {
    Sum,
    Avg,
    Count,
    Min,
    Max,
    Stddev,
    Stdvar,
    Topk,
    Bottomk,
    CountValues,
    Quantile,
}

impl AggregateOp {
    /// Resolve an identifier to an aggregation operator, if it names one.
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "sum" => Some(AggregateOp::Sum),
            "avg" => Some(AggregateOp::Avg),
            "count" => Some(AggregateOp::Count),
            "min" => Some(AggregateOp::Min),
            "max" => Some(AggregateOp::Max),
            "stddev" => Some(AggregateOp::Stddev),
            "stdvar" => Some(AggregateOp::Stdvar),
            "topk" => Some(AggregateOp::Topk),
            "bottomk" => Some(AggregateOp::Bottomk),
            "count_values" => Some(AggregateOp::CountValues),
            "quantile" => Some(AggregateOp::Quantile),
            _ => None,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            AggregateOp::Sum => "sum",
            AggregateOp::Avg => "avg",
            AggregateOp::Count => "count",
            AggregateOp::Min => "min",
            AggregateOp::Max => "max",
            AggregateOp::Stddev => "stddev",
            AggregateOp::Stdvar => "stdvar",
            AggregateOp::Topk => "topk",
            AggregateOp::Bottomk => "bottomk",
            AggregateOp::CountValues => "count_values",
            AggregateOp::Quantile => "quantile",
        }
    }

    /// Whether the operator takes a leading literal parameter, like
    /// `topk(3, expr)` or `count_values("version", expr)`.
    pub fn takes_param(&self) -> bool {
        matches!(
            self,
            AggregateOp::Topk
                | AggregateOp::Bottomk
                | AggregateOp::CountValues
                | AggregateOp::Quantile
        )
    }
}

/// Label grouping attached to an aggregation.
///
/// # Examples
/// ```text
/// sum by (job) (up)        // By(["job"])
/// sum without (pod) (up)   // Without(["pod"])
/// sum(up)                  // None
/// ```
#[derive(Debug, Clone, PartialEq)]
pub enum Grouping {
    None,
    By(Vec<String>),
    Without(Vec<String>),
}

/// Vector matching modifiers on a binary operation.
///
/// # Examples
/// ```text
/// a / on(job) b
/// a / ignoring(pod) group_left(version) b
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct VectorMatching {
    /// `on(...)` when true, `ignoring(...)` when false
    pub on: bool,
    /// Labels to match (or ignore) between the two operands
    pub labels: Vec<String>,
    /// Optional many-to-one / one-to-many modifier
    pub group: Option<GroupModifier>,
}

/// Grouping side of a many-to-one or one-to-many match, with the labels
/// copied from the "one" side.
#[derive(Debug, Clone, PartialEq)]
pub enum GroupModifier {
    Left(Vec<String>),
    Right(Vec<String>),
}
