//! # SQLx 数据库类型转换实现
//!
//! 枚举以整数序号存储 (0/1/2)，与线上格式的标签分离

use sqlx::encode::IsNull;
use sqlx::error::BoxDynError;
use sqlx::sqlite::{Sqlite, SqliteArgumentValue, SqliteTypeInfo, SqliteValueRef};
use sqlx::{Decode, Encode, Type};

use crate::entities::{OrdinalEnum, TaskPriority, TaskStatus};

impl Type<Sqlite> for TaskStatus {
    fn type_info() -> SqliteTypeInfo {
        <i64 as Type<Sqlite>>::type_info()
    }

    fn compatible(ty: &SqliteTypeInfo) -> bool {
        <i64 as Type<Sqlite>>::compatible(ty)
    }
}

impl<'r> Decode<'r, Sqlite> for TaskStatus {
    fn decode(value: SqliteValueRef<'r>) -> Result<Self, BoxDynError> {
        let ordinal = <i64 as Decode<Sqlite>>::decode(value)?;
        TaskStatus::from_ordinal(ordinal)
            .ok_or_else(|| format!("Invalid task status: {ordinal}").into())
    }
}

impl<'q> Encode<'q, Sqlite> for TaskStatus {
    fn encode_by_ref(
        &self,
        buf: &mut Vec<SqliteArgumentValue<'q>>,
    ) -> Result<IsNull, BoxDynError> {
        <i64 as Encode<Sqlite>>::encode(self.ordinal(), buf)
    }
}

impl Type<Sqlite> for TaskPriority {
    fn type_info() -> SqliteTypeInfo {
        <i64 as Type<Sqlite>>::type_info()
    }

    fn compatible(ty: &SqliteTypeInfo) -> bool {
        <i64 as Type<Sqlite>>::compatible(ty)
    }
}

impl<'r> Decode<'r, Sqlite> for TaskPriority {
    fn decode(value: SqliteValueRef<'r>) -> Result<Self, BoxDynError> {
        let ordinal = <i64 as Decode<Sqlite>>::decode(value)?;
        TaskPriority::from_ordinal(ordinal)
            .ok_or_else(|| format!("Invalid task priority: {ordinal}").into())
    }
}

impl<'q> Encode<'q, Sqlite> for TaskPriority {
    fn encode_by_ref(
        &self,
        buf: &mut Vec<SqliteArgumentValue<'q>>,
    ) -> Result<IsNull, BoxDynError> {
        <i64 as Encode<Sqlite>>::encode(self.ordinal(), buf)
    }
}
