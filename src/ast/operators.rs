use serde::{Deserialize, Serialize};

/// Calendar units used for addition, differences and DateRepeat components.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum TimeUnit {
    Year,
    Month,
    Day,
    Hour,
    Minute,
    Second,
}

impl TimeUnit {
    /// Largest unit first; the order DateRepeat additions are applied in.
    pub const ALL: [TimeUnit; 6] = [
        TimeUnit::Year,
        TimeUnit::Month,
        TimeUnit::Day,
        TimeUnit::Hour,
        TimeUnit::Minute,
        TimeUnit::Second,
    ];

    pub fn part(&self) -> DatePart {
        match self {
            TimeUnit::Year => DatePart::Year,
            TimeUnit::Month => DatePart::Month,
            TimeUnit::Day => DatePart::Day,
            TimeUnit::Hour => DatePart::Hour,
            TimeUnit::Minute => DatePart::Minute,
            TimeUnit::Second => DatePart::Second,
        }
    }

    /// Length in seconds for fixed-length units.
    pub fn fixed_seconds(&self) -> Option<i64> {
        match self {
            TimeUnit::Day => Some(86_400),
            TimeUnit::Hour => Some(3_600),
            TimeUnit::Minute => Some(60),
            TimeUnit::Second => Some(1),
            TimeUnit::Year | TimeUnit::Month => None,
        }
    }
}

impl std::fmt::Display for TimeUnit {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TimeUnit::Year => write!(f, "YEAR"),
            TimeUnit::Month => write!(f, "MONTH"),
            TimeUnit::Day => write!(f, "DAY"),
            TimeUnit::Hour => write!(f, "HOUR"),
            TimeUnit::Minute => write!(f, "MINUTE"),
            TimeUnit::Second => write!(f, "SECOND"),
        }
    }
}

/// Extractable components of a temporal value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DatePart {
    Year,
    Month,
    Day,
    Hour,
    Minute,
    /// Whole seconds (0..59)
    Second,
    /// Fraction of the current second (0 <= f < 1)
    Subsecond,
    /// Whole seconds since 1970-01-01 00:00:00
    Epoch,
}

/// Unary operators and single-argument functions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum UnaryOp {
    Not,
    Negate,
    IsNull,
    IsNotNull,
    // Numeric
    Abs,
    Sqrt,
    Floor,
    Ceil,
    Round,
    Sign,
    // Conversion
    ToText,
    ToInteger,
    ToNumber,
    ToDate,
    ToDateTime,
    // Text
    Upper,
    Lower,
    Trim,
    LeftTrim,
    RightTrim,
    Length,
    // Temporal
    Extract(DatePart),
    DayOfWeek,
    /// Component of a DateRepeat
    RepeatPart(TimeUnit),
    // Spatial
    PointX,
    PointY,
    AsText,
    BoundingBox,
    /// Aggregate over the grouped rows
    Aggregate(AggregateFunc),
}

impl UnaryOp {
    /// Prefix operators rendered without a function call.
    pub fn is_operator(&self) -> bool {
        matches!(
            self,
            UnaryOp::Not | UnaryOp::Negate | UnaryOp::IsNull | UnaryOp::IsNotNull
        )
    }
}

/// Binary operators and two-argument functions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BinaryOp {
    /// Equal (=)
    Eq,
    /// Not equal (<>)
    Ne,
    /// Less than (<)
    Lt,
    /// Less than or equal (<=)
    Lte,
    /// Greater than (>)
    Gt,
    /// Greater than or equal (>=)
    Gte,
    And,
    Or,
    /// Addition (+)
    Add,
    /// Subtraction (-)
    Sub,
    /// Multiplication (*)
    Mul,
    /// Division (/)
    Div,
    /// Division truncated toward zero
    IntDiv,
    /// Modulo (%)
    Rem,
    Power,
    /// String concatenation (||)
    Concat,
    /// LIKE pattern match
    Like,
    /// Case-insensitive LIKE
    ILike,
    /// 1-based position of right inside left, 0 when absent
    Position,
    /// Temporal value plus a count of units
    AddUnit(TimeUnit),
    /// Whole units elapsed from right to left
    UnitsBetween(TimeUnit),
    /// DateRepeat from right to left
    RepeatBetween,
    /// Temporal value plus a DateRepeat
    AddRepeat,
    /// Temporal value minus a DateRepeat
    SubtractRepeat,
    /// Point from x and y
    MakePoint,
    Distance,
    GeometryEquals,
}

impl BinaryOp {
    pub fn is_comparison(&self) -> bool {
        matches!(
            self,
            BinaryOp::Eq | BinaryOp::Ne | BinaryOp::Lt | BinaryOp::Lte | BinaryOp::Gt | BinaryOp::Gte
        )
    }

    pub fn is_logical(&self) -> bool {
        matches!(self, BinaryOp::And | BinaryOp::Or)
    }

    /// Infix SQL symbol for operators that have one.
    pub fn sql_symbol(&self) -> Option<&'static str> {
        match self {
            BinaryOp::Eq => Some("="),
            BinaryOp::Ne => Some("<>"),
            BinaryOp::Lt => Some("<"),
            BinaryOp::Lte => Some("<="),
            BinaryOp::Gt => Some(">"),
            BinaryOp::Gte => Some(">="),
            BinaryOp::And => Some("AND"),
            BinaryOp::Or => Some("OR"),
            BinaryOp::Add => Some("+"),
            BinaryOp::Sub => Some("-"),
            BinaryOp::Mul => Some("*"),
            BinaryOp::Div => Some("/"),
            BinaryOp::Like => Some("LIKE"),
            BinaryOp::ILike => Some("ILIKE"),
            _ => None,
        }
    }

    /// Comparison with operands swapped (a < b == b > a).
    pub fn flipped(&self) -> BinaryOp {
        match self {
            BinaryOp::Lt => BinaryOp::Gt,
            BinaryOp::Lte => BinaryOp::Gte,
            BinaryOp::Gt => BinaryOp::Lt,
            BinaryOp::Gte => BinaryOp::Lte,
            other => *other,
        }
    }
}

impl std::fmt::Display for BinaryOp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.sql_symbol() {
            Some(sym) => write!(f, "{}", sym),
            None => write!(f, "{:?}", self),
        }
    }
}

/// Operators over a variable number of arguments.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NaryOp {
    Coalesce,
    Greatest,
    Least,
    /// SUBSTRING(text, start, length), 1-based
    Substring,
    /// REPLACE(text, from, to)
    Replace,
    /// Conjunction of every argument
    AllOf,
    /// Disjunction of every argument
    AnyOf,
    /// First argument IN (rest)
    In,
    /// First argument NOT IN (rest)
    NotIn,
}

/// Aggregate functions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AggregateFunc {
    Count,
    CountDistinct,
    Sum,
    Avg,
    Min,
    Max,
}

impl std::fmt::Display for AggregateFunc {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AggregateFunc::Count | AggregateFunc::CountDistinct => write!(f, "COUNT"),
            AggregateFunc::Sum => write!(f, "SUM"),
            AggregateFunc::Avg => write!(f, "AVG"),
            AggregateFunc::Min => write!(f, "MIN"),
            AggregateFunc::Max => write!(f, "MAX"),
        }
    }
}

/// Sort order direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SortOrder {
    Asc,
    Desc,
    /// ASC NULLS FIRST (nulls at top)
    AscNullsFirst,
    /// ASC NULLS LAST (nulls at bottom)
    AscNullsLast,
    /// DESC NULLS FIRST (nulls at top)
    DescNullsFirst,
    /// DESC NULLS LAST (nulls at bottom)
    DescNullsLast,
}

impl SortOrder {
    pub fn is_descending(&self) -> bool {
        matches!(
            self,
            SortOrder::Desc | SortOrder::DescNullsFirst | SortOrder::DescNullsLast
        )
    }

    /// Some(true) for NULLS FIRST, Some(false) for NULLS LAST.
    pub fn nulls_first(&self) -> Option<bool> {
        match self {
            SortOrder::AscNullsFirst | SortOrder::DescNullsFirst => Some(true),
            SortOrder::AscNullsLast | SortOrder::DescNullsLast => Some(false),
            SortOrder::Asc | SortOrder::Desc => None,
        }
    }

    /// Same direction without a nulls placement.
    pub fn direction_only(&self) -> SortOrder {
        if self.is_descending() {
            SortOrder::Desc
        } else {
            SortOrder::Asc
        }
    }

    pub fn sql_keyword(&self) -> &'static str {
        match self {
            SortOrder::Asc => "ASC",
            SortOrder::Desc => "DESC",
            SortOrder::AscNullsFirst => "ASC NULLS FIRST",
            SortOrder::AscNullsLast => "ASC NULLS LAST",
            SortOrder::DescNullsFirst => "DESC NULLS FIRST",
            SortOrder::DescNullsLast => "DESC NULLS LAST",
        }
    }
}
