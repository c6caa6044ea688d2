use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Category of a billed fee
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(type_name = "fee_type", rename_all = "snake_case"))]
#[serde(rename_all = "snake_case")]
pub enum FeeType {
    Tuition,
    Library,
    Lab,
    Sports,
    Transport,
    Hostel,
    Other,
}

impl std::fmt::Display for FeeType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FeeType::Tuition => write!(f, "tuition"),
            FeeType::Library => write!(f, "library"),
            FeeType::Lab => write!(f, "lab"),
            FeeType::Sports => write!(f, "sports"),
            FeeType::Transport => write!(f, "transport"),
            FeeType::Hostel => write!(f, "hostel"),
            FeeType::Other => write!(f, "other"),
        }
    }
}

impl FromStr for FeeType {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "tuition" => Ok(FeeType::Tuition),
            "library" => Ok(FeeType::Library),
            "lab" => Ok(FeeType::Lab),
            "sports" => Ok(FeeType::Sports),
            "transport" => Ok(FeeType::Transport),
            "hostel" => Ok(FeeType::Hostel),
            "other" => Ok(FeeType::Other),
            _ => Err(()),
        }
    }
}

/// Settlement state of a fee, always derived from amounts and due date
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(type_name = "fee_status", rename_all = "snake_case"))]
#[serde(rename_all = "snake_case")]
pub enum FeeStatus {
    Pending,
    Partial,
    Paid,
    Overdue,
}

impl std::fmt::Display for FeeStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FeeStatus::Pending => write!(f, "pending"),
            FeeStatus::Partial => write!(f, "partial"),
            FeeStatus::Paid => write!(f, "paid"),
            FeeStatus::Overdue => write!(f, "overdue"),
        }
    }
}

impl FromStr for FeeStatus {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(FeeStatus::Pending),
            "partial" => Ok(FeeStatus::Partial),
            "paid" => Ok(FeeStatus::Paid),
            "overdue" => Ok(FeeStatus::Overdue),
            _ => Err(()),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(type_name = "payment_method", rename_all = "snake_case"))]
#[serde(rename_all = "snake_case")]
pub enum PaymentMethod {
    Cash,
    Online,
    Cheque,
    BankTransfer,
}

impl std::fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PaymentMethod::Cash => write!(f, "cash"),
            PaymentMethod::Online => write!(f, "online"),
            PaymentMethod::Cheque => write!(f, "cheque"),
            PaymentMethod::BankTransfer => write!(f, "bank_transfer"),
        }
    }
}

impl FromStr for PaymentMethod {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "cash" => Ok(PaymentMethod::Cash),
            "online" => Ok(PaymentMethod::Online),
            "cheque" => Ok(PaymentMethod::Cheque),
            "bank_transfer" => Ok(PaymentMethod::BankTransfer),
            _ => Err(()),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(type_name = "semester", rename_all = "PascalCase"))]
pub enum Semester {
    #[default]
    Fall,
    Spring,
    Summer,
}

impl std::fmt::Display for Semester {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Semester::Fall => write!(f, "Fall"),
            Semester::Spring => write!(f, "Spring"),
            Semester::Summer => write!(f, "Summer"),
        }
    }
}

impl FromStr for Semester {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Fall" => Ok(Semester::Fall),
            "Spring" => Ok(Semester::Spring),
            "Summer" => Ok(Semester::Summer),
            _ => Err(()),
        }
    }
}
