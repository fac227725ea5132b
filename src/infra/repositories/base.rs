//! Query helpers shared by every repository.
//!
//! Helpers are generic over [`ConnectionTrait`] so the same code runs on a
//! pooled connection and inside a transaction.

use sea_orm::sea_query::{Expr, Func, IntoColumnRef, LikeExpr, SimpleExpr};
use sea_orm::{ConnectionTrait, EntityTrait, FromQueryResult, PaginatorTrait, Select};

use crate::errors::AppResult;
use crate::types::PaginationParams;

/// One page of `select` plus the total row count.
pub(crate) async fn fetch_page<C, E, M>(
    conn: &C,
    select: Select<E>,
    params: &PaginationParams,
) -> AppResult<(Vec<M>, u64)>
where
    C: ConnectionTrait,
    E: EntityTrait<Model = M>,
    M: FromQueryResult + Sized + Send + Sync + 'static,
{
    let paginator = select.paginate(conn, params.limit());
    let total = paginator.num_items().await?;
    let data = paginator.fetch_page(params.page.saturating_sub(1)).await?;
    Ok((data, total))
}

/// Row count of `select`.
pub(crate) async fn count<C, E, M>(conn: &C, select: Select<E>) -> AppResult<u64>
where
    C: ConnectionTrait,
    E: EntityTrait<Model = M>,
    M: FromQueryResult + Sized + Send + Sync + 'static,
{
    Ok(select.count(conn).await?)
}

/// `LOWER(column) LIKE '%needle%'` with `%`, `_` and `\` in the needle escaped.
pub(crate) fn contains_ci<T: IntoColumnRef>(column: T, needle: &str) -> SimpleExpr {
    let pattern = format!("%{}%", escape_like(&needle.to_lowercase()));
    Expr::expr(Func::lower(Expr::col(column))).like(LikeExpr::new(pattern).escape('\\'))
}

fn escape_like(raw: &str) -> String {
    let mut escaped = String::with_capacity(raw.len());
    for c in raw.chars() {
        if matches!(c, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape_like() {
        assert_eq!(escape_like("100%_cotton"), "100\\%\\_cotton");
        assert_eq!(escape_like("plain"), "plain");
    }
}
