//! OrderRepository - order persistence and the order fetch strategies
//!
//! Retrieval of an order graph (order + member + delivery + lines) comes in
//! four flavors, mirroring the four API versions:
//! - per-root loads (`find_lines_by_order_id` et al.): one query per
//!   association, the unoptimized baseline;
//! - to-one join (`find_all_with_member_delivery`): member and delivery in
//!   one query, exact pagination, lines not loaded;
//! - collection join (`find_all_with_item`): everything in one query, roots
//!   deduplicated in memory, no pagination possible;
//! - to-one join + `IN`-batched line loading (`attach_order_items`): the
//!   strategy the paginated endpoint uses.

use super::Read;
use crate::dtos::{OrderDTO, OrderItemDTO, OrderSearch};
use crate::entities::{
    Address, Delivery, DeliveryStatus, Item, ItemKind, Member, Order, OrderGraph, OrderItem,
    OrderLine, OrderStatus,
};
use chrono::{DateTime, Utc};
use sqlx::{Error, QueryBuilder, SqlitePool};
use std::collections::{HashMap, HashSet};
use tracing::{debug, info, instrument};

/// Safety cap applied to every unpaginated root query.
const MAX_RESULTS: i64 = 1000;

/// Root cap of the collection-join strategy. The join multiplies rows per
/// line, so this cap can only be applied after in-memory deduplication.
const COLLECTION_JOIN_MAX_ROOTS: usize = 100;

const ROOT_COLUMNS: &str = "o.order_id, o.member_id, o.delivery_id, o.order_date, o.order_status, \
     m.name AS m_name, m.city AS m_city, m.street AS m_street, m.zipcode AS m_zipcode, \
     d.city AS d_city, d.street AS d_street, d.zipcode AS d_zipcode, d.delivery_status";

const ROOT_JOIN: &str = "FROM orders o \
     INNER JOIN members m ON m.member_id = o.member_id \
     INNER JOIN deliveries d ON d.delivery_id = o.delivery_id";

const LINE_COLUMNS: &str = "oi.order_item_id, oi.order_id, oi.item_id, oi.order_price, oi.count, \
     i.kind, i.name AS i_name, i.price, i.stock_quantity, i.author, i.isbn";

const LINE_JOIN: &str = "FROM order_items oi INNER JOIN items i ON i.item_id = oi.item_id";

/// Splits the root ids into `ceil(len / batch_size)` chunks of at most
/// `batch_size` ids - one `IN` query is issued per chunk.
fn id_batches(ids: &[i64], batch_size: usize) -> std::slice::Chunks<'_, i64> {
    ids.chunks(batch_size.max(1))
}

/// Row of the to-one join: order columns plus aliased member and delivery
/// columns.
#[derive(sqlx::FromRow)]
struct OrderRootRow {
    order_id: i64,
    member_id: i64,
    delivery_id: i64,
    order_date: DateTime<Utc>,
    order_status: OrderStatus,
    m_name: String,
    m_city: String,
    m_street: String,
    m_zipcode: String,
    d_city: String,
    d_street: String,
    d_zipcode: String,
    delivery_status: DeliveryStatus,
}

impl OrderRootRow {
    fn into_graph(self) -> OrderGraph {
        OrderGraph {
            order: Order {
                order_id: self.order_id,
                member_id: self.member_id,
                delivery_id: self.delivery_id,
                order_date: self.order_date,
                order_status: self.order_status,
            },
            member: Member {
                member_id: self.member_id,
                name: self.m_name,
                address: Address {
                    city: self.m_city,
                    street: self.m_street,
                    zipcode: self.m_zipcode,
                },
            },
            delivery: Delivery {
                delivery_id: self.delivery_id,
                address: Address {
                    city: self.d_city,
                    street: self.d_street,
                    zipcode: self.d_zipcode,
                },
                delivery_status: self.delivery_status,
            },
            order_items: Vec::new(),
        }
    }
}

/// Row of one order line joined with its item.
#[derive(sqlx::FromRow)]
struct OrderLineRow {
    order_item_id: i64,
    order_id: i64,
    item_id: i64,
    order_price: i64,
    count: i64,
    kind: String,
    i_name: String,
    price: i64,
    stock_quantity: i64,
    author: Option<String>,
    isbn: Option<String>,
}

impl OrderLineRow {
    fn into_line(self) -> Result<OrderLine, Error> {
        let kind = ItemKind::from_parts(&self.kind, self.author, self.isbn)
            .map_err(|e| Error::Decode(Box::new(e)))?;

        Ok(OrderLine {
            order_item: OrderItem {
                order_item_id: self.order_item_id,
                order_id: self.order_id,
                item_id: self.item_id,
                order_price: self.order_price,
                count: self.count,
            },
            item: Item {
                item_id: self.item_id,
                name: self.i_name,
                price: self.price,
                stock_quantity: self.stock_quantity,
                kind,
            },
        })
    }
}

/// Row of the collection join: root and line columns side by side.
#[derive(sqlx::FromRow)]
struct OrderFullRow {
    #[sqlx(flatten)]
    root: OrderRootRow,
    #[sqlx(flatten)]
    line: OrderLineRow,
}

// ORDER REPOSITORY
pub struct OrderRepository {
    connection_pool: SqlitePool,
    batch_fetch_size: usize,
}

impl OrderRepository {
    pub fn new(connection_pool: SqlitePool, batch_fetch_size: usize) -> Self {
        Self {
            connection_pool,
            batch_fetch_size: batch_fetch_size.max(1),
        }
    }

    /// Persists a placed order atomically: the decremented item stock, the
    /// delivery built from the member's address, the order row and its
    /// line. `item` must already carry the decremented stock and provides
    /// the price snapshot.
    #[instrument(skip(self, member, item), fields(member_id = %member.member_id, item_id = %item.item_id))]
    pub async fn place(&self, member: &Member, item: &Item, count: i64) -> Result<Order, Error> {
        debug!("Placing order");
        let mut tx = self.connection_pool.begin().await?;

        sqlx::query("UPDATE items SET stock_quantity = ? WHERE item_id = ?")
            .bind(item.stock_quantity)
            .bind(item.item_id)
            .execute(&mut *tx)
            .await?;

        let delivery = sqlx::query(
            "INSERT INTO deliveries (city, street, zipcode, delivery_status) VALUES (?, ?, ?, ?)",
        )
        .bind(&member.address.city)
        .bind(&member.address.street)
        .bind(&member.address.zipcode)
        .bind(DeliveryStatus::Ready)
        .execute(&mut *tx)
        .await?;
        let delivery_id = delivery.last_insert_rowid();

        let order_date = Utc::now();
        let order = sqlx::query(
            "INSERT INTO orders (member_id, delivery_id, order_date, order_status) VALUES (?, ?, ?, ?)",
        )
        .bind(member.member_id)
        .bind(delivery_id)
        .bind(order_date)
        .bind(OrderStatus::Order)
        .execute(&mut *tx)
        .await?;
        let order_id = order.last_insert_rowid();

        sqlx::query(
            "INSERT INTO order_items (order_id, item_id, order_price, count) VALUES (?, ?, ?, ?)",
        )
        .bind(order_id)
        .bind(item.item_id)
        .bind(item.price)
        .bind(count)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;

        info!("Order {} placed", order_id);

        Ok(Order {
            order_id,
            member_id: member.member_id,
            delivery_id,
            order_date,
            order_status: OrderStatus::Order,
        })
    }

    /// Persists a cancellation atomically: the flipped status plus the
    /// stock restored to every item referenced by the order's lines.
    #[instrument(skip(self, order), fields(order_id = %order.order_id))]
    pub async fn cancel(&self, order: &Order) -> Result<(), Error> {
        debug!("Canceling order");
        let mut tx = self.connection_pool.begin().await?;

        let lines = sqlx::query_as::<_, OrderItem>(
            "SELECT order_item_id, order_id, item_id, order_price, count FROM order_items WHERE order_id = ?",
        )
        .bind(order.order_id)
        .fetch_all(&mut *tx)
        .await?;

        for line in &lines {
            sqlx::query("UPDATE items SET stock_quantity = stock_quantity + ? WHERE item_id = ?")
                .bind(line.count)
                .bind(line.item_id)
                .execute(&mut *tx)
                .await?;
        }

        sqlx::query("UPDATE orders SET order_status = ? WHERE order_id = ?")
            .bind(order.order_status)
            .bind(order.order_id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;

        info!(
            "Order {} canceled, {} lines restocked",
            order.order_id,
            lines.len()
        );
        Ok(())
    }

    pub async fn read_delivery(&self, delivery_id: &i64) -> Result<Option<Delivery>, Error> {
        let delivery = sqlx::query_as::<_, Delivery>(
            "SELECT delivery_id, city, street, zipcode, delivery_status FROM deliveries WHERE delivery_id = ?",
        )
        .bind(delivery_id)
        .fetch_optional(&self.connection_pool)
        .await?;

        Ok(delivery)
    }

    /// Loads the lines of a single order, each line's item resolved. This
    /// is the per-root load the unoptimized path pays once per order.
    pub async fn find_lines_by_order_id(&self, order_id: &i64) -> Result<Vec<OrderLine>, Error> {
        let sql = format!("SELECT {LINE_COLUMNS} {LINE_JOIN} WHERE oi.order_id = ? ORDER BY oi.order_item_id");
        let rows: Vec<OrderLineRow> = sqlx::query_as(&sql)
            .bind(order_id)
            .fetch_all(&self.connection_pool)
            .await?;

        rows.into_iter().map(OrderLineRow::into_line).collect()
    }

    /// Search built by assembling the SQL string by hand, switching between
    /// `WHERE` and `AND` as predicates come in. Kept deliberately alongside
    /// [`Self::find_all_by_predicate`]; the two must stay interchangeable.
    #[instrument(skip(self, search), fields(status = ?search.status))]
    pub async fn find_all_by_string(&self, search: &OrderSearch) -> Result<Vec<Order>, Error> {
        debug!("Searching orders (string assembly)");
        let mut sql = String::from(
            "SELECT o.order_id, o.member_id, o.delivery_id, o.order_date, o.order_status \
             FROM orders o INNER JOIN members m ON m.member_id = o.member_id",
        );

        let mut is_first_condition = true;
        if search.status.is_some() {
            sql.push_str(if is_first_condition { " WHERE" } else { " AND" });
            is_first_condition = false;
            sql.push_str(" o.order_status = ?");
        }
        if search.member_name_filter().is_some() {
            sql.push_str(if is_first_condition { " WHERE" } else { " AND" });
            sql.push_str(" m.name LIKE ?");
        }
        sql.push_str(" ORDER BY o.order_id LIMIT ?");

        let mut query = sqlx::query_as::<_, Order>(&sql);
        if let Some(status) = search.status {
            query = query.bind(status);
        }
        if let Some(name) = search.member_name_filter() {
            query = query.bind(format!("%{name}%"));
        }
        query = query.bind(MAX_RESULTS);

        query.fetch_all(&self.connection_pool).await
    }

    /// Search built from structured predicates on a `QueryBuilder` - the
    /// second construction strategy for the same filter.
    #[instrument(skip(self, search), fields(status = ?search.status))]
    pub async fn find_all_by_predicate(&self, search: &OrderSearch) -> Result<Vec<Order>, Error> {
        debug!("Searching orders (predicate builder)");
        let mut query_builder = QueryBuilder::new(
            "SELECT o.order_id, o.member_id, o.delivery_id, o.order_date, o.order_status \
             FROM orders o INNER JOIN members m ON m.member_id = o.member_id",
        );

        let mut keyword = " WHERE ";
        if let Some(status) = search.status {
            query_builder
                .push(keyword)
                .push("o.order_status = ")
                .push_bind(status);
            keyword = " AND ";
        }
        if let Some(name) = search.member_name_filter() {
            query_builder
                .push(keyword)
                .push("m.name LIKE ")
                .push_bind(format!("%{name}%"));
        }
        query_builder
            .push(" ORDER BY o.order_id LIMIT ")
            .push_bind(MAX_RESULTS);

        query_builder
            .build_query_as::<Order>()
            .fetch_all(&self.connection_pool)
            .await
    }

    /// Root fetcher: orders with member and delivery resolved in a single
    /// query. Only to-one relations are joined, so row count equals root
    /// count and the safety cap works on roots directly. Lines are left
    /// empty for [`Self::attach_order_items`].
    #[instrument(skip(self))]
    pub async fn find_all_with_member_delivery(&self) -> Result<Vec<OrderGraph>, Error> {
        debug!("Fetching roots with to-one joins");
        let sql = format!("SELECT {ROOT_COLUMNS} {ROOT_JOIN} ORDER BY o.order_id LIMIT ?");
        let rows: Vec<OrderRootRow> = sqlx::query_as(&sql)
            .bind(MAX_RESULTS)
            .fetch_all(&self.connection_pool)
            .await?;

        Ok(rows.into_iter().map(OrderRootRow::into_graph).collect())
    }

    /// Paginated root fetcher. Offset and limit apply to the root query
    /// directly - exact pagination is only possible because the to-many
    /// collection is not part of this join.
    #[instrument(skip(self))]
    pub async fn find_all_with_member_delivery_paged(
        &self,
        offset: i64,
        limit: i64,
    ) -> Result<Vec<OrderGraph>, Error> {
        debug!("Fetching root page with to-one joins");
        let sql = format!("SELECT {ROOT_COLUMNS} {ROOT_JOIN} ORDER BY o.order_id LIMIT ? OFFSET ?");
        let rows: Vec<OrderRootRow> = sqlx::query_as(&sql)
            .bind(limit)
            .bind(offset)
            .fetch_all(&self.connection_pool)
            .await?;

        Ok(rows.into_iter().map(OrderRootRow::into_graph).collect())
    }

    /// Collection batch loader: resolves the lines of every root through
    /// `IN`-clause queries bounded by the configured batch size -
    /// `ceil(roots / batch_fetch_size)` child queries, independent of the
    /// per-order fan-out. The grandchild level (each line's item) is then
    /// resolved the same way over the distinct item ids. The root page
    /// fixed by the caller is never perturbed.
    #[instrument(skip(self, graphs), fields(roots = graphs.len(), batch = self.batch_fetch_size))]
    pub async fn attach_order_items(&self, graphs: &mut [OrderGraph]) -> Result<(), Error> {
        // An empty IN list is ill-formed SQL; an empty page needs no query.
        if graphs.is_empty() {
            return Ok(());
        }

        let mut ids: Vec<i64> = Vec::with_capacity(graphs.len());
        let mut lines_by_order: HashMap<i64, Vec<OrderItem>> =
            HashMap::with_capacity(graphs.len());
        for graph in graphs.iter() {
            if lines_by_order
                .insert(graph.order.order_id, Vec::new())
                .is_none()
            {
                ids.push(graph.order.order_id);
            }
        }

        for chunk in id_batches(&ids, self.batch_fetch_size) {
            let mut query_builder = QueryBuilder::new(
                "SELECT order_item_id, order_id, item_id, order_price, count \
                 FROM order_items WHERE order_id IN (",
            );
            let mut separated = query_builder.separated(", ");
            for id in chunk {
                separated.push_bind(*id);
            }
            // per-parent insertion order comes from the store
            query_builder.push(") ORDER BY order_id, order_item_id");

            let rows: Vec<OrderItem> = query_builder
                .build_query_as()
                .fetch_all(&self.connection_pool)
                .await?;

            for row in rows {
                match lines_by_order.get_mut(&row.order_id) {
                    Some(lines) => lines.push(row),
                    // a child whose parent is not in the root set is
                    // dropped, never a fault
                    None => debug!("Dropping line of unknown order {}", row.order_id),
                }
            }
        }

        // one level down: the distinct item ids of all lines, batched the
        // same way
        let mut item_ids: Vec<i64> = Vec::new();
        let mut seen_items: HashSet<i64> = HashSet::new();
        for id in &ids {
            for line in &lines_by_order[id] {
                if seen_items.insert(line.item_id) {
                    item_ids.push(line.item_id);
                }
            }
        }

        let mut items_by_id: HashMap<i64, Item> = HashMap::with_capacity(item_ids.len());
        for chunk in id_batches(&item_ids, self.batch_fetch_size) {
            let mut query_builder = QueryBuilder::new(
                "SELECT item_id, kind, name, price, stock_quantity, author, isbn \
                 FROM items WHERE item_id IN (",
            );
            let mut separated = query_builder.separated(", ");
            for id in chunk {
                separated.push_bind(*id);
            }
            query_builder.push(")");

            let items: Vec<Item> = query_builder
                .build_query_as()
                .fetch_all(&self.connection_pool)
                .await?;

            for item in items {
                items_by_id.insert(item.item_id, item);
            }
        }

        for graph in graphs.iter_mut() {
            let Some(lines) = lines_by_order.get(&graph.order.order_id) else {
                continue;
            };
            graph.order_items = lines
                .iter()
                .filter_map(|order_item| {
                    items_by_id.get(&order_item.item_id).map(|item| OrderLine {
                        order_item: order_item.clone(),
                        item: item.clone(),
                    })
                })
                .collect();
        }

        info!(
            "Attached lines to {} roots in {} + {} batches",
            ids.len(),
            ids.len().div_ceil(self.batch_fetch_size),
            item_ids.len().div_ceil(self.batch_fetch_size)
        );
        Ok(())
    }

    /// Single-query strategy: joins the collection (and its items) into
    /// the root query. Every root row is multiplied by its line count, so
    /// roots are deduplicated while folding and the root cap has to be
    /// applied in memory - which is exactly why this variant cannot
    /// paginate. Orders without lines do not appear at all (inner join).
    #[instrument(skip(self))]
    pub async fn find_all_with_item(&self) -> Result<Vec<OrderGraph>, Error> {
        debug!("Fetching full graphs through a collection join");
        let sql = format!(
            "SELECT {ROOT_COLUMNS}, {LINE_COLUMNS} {ROOT_JOIN} \
             INNER JOIN order_items oi ON oi.order_id = o.order_id \
             INNER JOIN items i ON i.item_id = oi.item_id \
             ORDER BY o.order_id, oi.order_item_id"
        );
        let rows: Vec<OrderFullRow> = sqlx::query_as(&sql)
            .fetch_all(&self.connection_pool)
            .await?;

        let mut graphs: Vec<OrderGraph> = Vec::new();
        let mut index_by_id: HashMap<i64, usize> = HashMap::new();
        for row in rows {
            let line = row.line.into_line()?;
            match index_by_id.get(&row.root.order_id) {
                Some(&at) => graphs[at].order_items.push(line),
                None => {
                    index_by_id.insert(row.root.order_id, graphs.len());
                    let mut graph = row.root.into_graph();
                    graph.order_items.push(line);
                    graphs.push(graph);
                }
            }
        }

        graphs.truncate(COLLECTION_JOIN_MAX_ROOTS);
        Ok(graphs)
    }

    /// Query-time projection: selects only the columns the flat DTO needs.
    /// Output must be identical to projecting the graphs built by
    /// [`Self::find_all_with_member_delivery`] +
    /// [`Self::attach_order_items`]; the saving is in columns fetched, the
    /// cost is a fetch path that cannot be reused for other projections.
    #[instrument(skip(self))]
    pub async fn find_order_dtos(&self) -> Result<Vec<OrderDTO>, Error> {
        debug!("Fetching flat order DTOs");

        #[derive(sqlx::FromRow)]
        struct OrderDtoRow {
            order_id: i64,
            name: String,
            order_date: DateTime<Utc>,
            order_status: OrderStatus,
            city: String,
            street: String,
            zipcode: String,
        }

        #[derive(sqlx::FromRow)]
        struct OrderItemDtoRow {
            order_id: i64,
            item_name: String,
            order_price: i64,
            count: i64,
        }

        let roots: Vec<OrderDtoRow> = sqlx::query_as(
            "SELECT o.order_id, m.name, o.order_date, o.order_status, d.city, d.street, d.zipcode \
             FROM orders o \
             INNER JOIN members m ON m.member_id = o.member_id \
             INNER JOIN deliveries d ON d.delivery_id = o.delivery_id \
             ORDER BY o.order_id LIMIT ?",
        )
        .bind(MAX_RESULTS)
        .fetch_all(&self.connection_pool)
        .await?;

        let mut dtos: Vec<OrderDTO> = roots
            .into_iter()
            .map(|row| OrderDTO {
                order_id: row.order_id,
                name: row.name,
                order_date: row.order_date,
                order_status: row.order_status,
                address: Address {
                    city: row.city,
                    street: row.street,
                    zipcode: row.zipcode,
                },
                order_items: Vec::new(),
            })
            .collect();

        if dtos.is_empty() {
            return Ok(dtos);
        }

        let ids: Vec<i64> = dtos.iter().map(|dto| dto.order_id).collect();
        let mut lines_by_order: HashMap<i64, Vec<OrderItemDTO>> =
            ids.iter().map(|id| (*id, Vec::new())).collect();

        for chunk in id_batches(&ids, self.batch_fetch_size) {
            let mut query_builder = QueryBuilder::new(
                "SELECT oi.order_id, i.name AS item_name, oi.order_price, oi.count \
                 FROM order_items oi INNER JOIN items i ON i.item_id = oi.item_id \
                 WHERE oi.order_id IN (",
            );
            let mut separated = query_builder.separated(", ");
            for id in chunk {
                separated.push_bind(*id);
            }
            query_builder.push(") ORDER BY oi.order_id, oi.order_item_id");

            let rows: Vec<OrderItemDtoRow> = query_builder
                .build_query_as()
                .fetch_all(&self.connection_pool)
                .await?;

            for row in rows {
                if let Some(lines) = lines_by_order.get_mut(&row.order_id) {
                    lines.push(OrderItemDTO {
                        item_name: row.item_name,
                        order_price: row.order_price,
                        count: row.count,
                    });
                }
            }
        }

        for dto in dtos.iter_mut() {
            if let Some(lines) = lines_by_order.remove(&dto.order_id) {
                dto.order_items = lines;
            }
        }

        Ok(dtos)
    }
}

impl Read<Order, i64> for OrderRepository {
    async fn read(&self, id: &i64) -> Result<Option<Order>, Error> {
        let order = sqlx::query_as::<_, Order>(
            "SELECT order_id, member_id, delivery_id, order_date, order_status FROM orders WHERE order_id = ?",
        )
        .bind(id)
        .fetch_optional(&self.connection_pool)
        .await?;

        Ok(order)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /*----------------------------------- */
    /* Unit tests: id batching            */
    /*----------------------------------- */

    #[test]
    fn id_batches_has_ceil_len_over_size_chunks() {
        let ids: Vec<i64> = (1..=10).collect();

        assert_eq!(id_batches(&ids, 3).count(), 4);
        assert_eq!(id_batches(&ids, 5).count(), 2);
        assert_eq!(id_batches(&ids, 100).count(), 1);
        assert_eq!(id_batches(&[], 3).count(), 0);
    }

    #[test]
    fn id_batches_chunks_preserve_order_and_bound() {
        let ids: Vec<i64> = vec![1, 2, 3];

        let chunks: Vec<&[i64]> = id_batches(&ids, 2).collect();

        assert_eq!(chunks, vec![&[1_i64, 2][..], &[3_i64][..]]);
    }

    /*----------------------------------- */
    /* Root fetcher                       */
    /*----------------------------------- */

    #[sqlx::test(fixtures(path = "../../fixtures", scripts("members", "items", "orders")))]
    async fn root_fetch_resolves_member_and_delivery(pool: SqlitePool) -> sqlx::Result<()> {
        let repo = OrderRepository::new(pool, 100);

        let graphs = repo.find_all_with_member_delivery().await?;

        assert_eq!(graphs.len(), 3);
        assert_eq!(graphs[0].member.name, "userA");
        assert_eq!(graphs[0].delivery.address.city, "Seoul");
        assert_eq!(graphs[2].member.name, "kim");
        // lines are not part of this stage
        assert!(graphs.iter().all(|g| g.order_items.is_empty()));
        Ok(())
    }

    #[sqlx::test(fixtures(path = "../../fixtures", scripts("members", "items", "orders")))]
    async fn root_page_respects_offset_and_limit(pool: SqlitePool) -> sqlx::Result<()> {
        let repo = OrderRepository::new(pool, 100);

        let page = repo.find_all_with_member_delivery_paged(0, 2).await?;
        assert_eq!(page.len(), 2);
        assert_eq!(page[0].order.order_id, 1);
        assert_eq!(page[1].order.order_id, 2);

        let rest = repo.find_all_with_member_delivery_paged(2, 2).await?;
        assert_eq!(rest.len(), 1);
        assert_eq!(rest[0].order.order_id, 3);
        Ok(())
    }

    /*----------------------------------- */
    /* Collection batch loader            */
    /*----------------------------------- */

    #[sqlx::test(fixtures(path = "../../fixtures", scripts("members", "items", "orders")))]
    async fn attach_fills_lines_in_store_order(pool: SqlitePool) -> sqlx::Result<()> {
        let repo = OrderRepository::new(pool, 100);
        let mut graphs = repo.find_all_with_member_delivery().await?;

        repo.attach_order_items(&mut graphs).await?;

        let names: Vec<&str> = graphs[0]
            .order_items
            .iter()
            .map(|l| l.item.name.as_str())
            .collect();
        assert_eq!(names, vec!["JPA1 BOOK", "JPA2 BOOK"]);
        assert_eq!(graphs[1].order_items.len(), 2);
        assert_eq!(graphs[2].order_items.len(), 1);
        Ok(())
    }

    #[sqlx::test(fixtures(path = "../../fixtures", scripts("members", "items")))]
    async fn batch_loader_chunks_and_keeps_root_order(pool: SqlitePool) -> sqlx::Result<()> {
        // 3 roots with 2, 0 and 5 lines; batch size 2 means two IN queries
        sqlx::query(
            "INSERT INTO deliveries (delivery_id, city, street, zipcode, delivery_status) VALUES \
             (1, 'Seoul', '1', '11111', 'READY'), \
             (2, 'Seoul', '1', '11111', 'READY'), \
             (3, 'Seoul', '1', '11111', 'READY')",
        )
        .execute(&pool)
        .await?;
        sqlx::query(
            "INSERT INTO orders (order_id, member_id, delivery_id, order_date, order_status) VALUES \
             (1, 1, 1, '2024-02-01T10:00:00+00:00', 'ORDER'), \
             (2, 1, 2, '2024-02-01T11:00:00+00:00', 'ORDER'), \
             (3, 1, 3, '2024-02-01T12:00:00+00:00', 'ORDER')",
        )
        .execute(&pool)
        .await?;
        sqlx::query(
            "INSERT INTO order_items (order_id, item_id, order_price, count) VALUES \
             (1, 1, 10000, 1), (1, 2, 20000, 1), \
             (3, 1, 10000, 1), (3, 2, 20000, 1), (3, 3, 20000, 1), (3, 4, 40000, 1), (3, 1, 10000, 2)",
        )
        .execute(&pool)
        .await?;

        let repo = OrderRepository::new(pool, 2);
        let mut graphs = repo.find_all_with_member_delivery().await?;
        let ids: Vec<i64> = graphs.iter().map(|g| g.order.order_id).collect();
        assert_eq!(id_batches(&ids, 2).count(), 2);

        repo.attach_order_items(&mut graphs).await?;

        let counts: Vec<usize> = graphs.iter().map(|g| g.order_items.len()).collect();
        assert_eq!(counts, vec![2, 0, 5]);

        // the union of attached lines equals the per-root loads
        for graph in &graphs {
            let individually = repo.find_lines_by_order_id(&graph.order.order_id).await?;
            assert_eq!(graph.order_items, individually);
        }
        Ok(())
    }

    #[sqlx::test]
    async fn attach_on_empty_page_is_a_no_op(pool: SqlitePool) -> sqlx::Result<()> {
        let repo = OrderRepository::new(pool, 100);
        let mut graphs: Vec<OrderGraph> = Vec::new();

        repo.attach_order_items(&mut graphs).await?;

        assert!(graphs.is_empty());
        Ok(())
    }

    /*----------------------------------- */
    /* Search strategies                  */
    /*----------------------------------- */

    #[sqlx::test(fixtures(path = "../../fixtures", scripts("members", "items", "orders")))]
    async fn search_strategies_agree_on_the_filter_cross_product(
        pool: SqlitePool,
    ) -> sqlx::Result<()> {
        let repo = OrderRepository::new(pool, 100);
        let filters = [
            OrderSearch::default(),
            OrderSearch {
                status: Some(OrderStatus::Cancel),
                member_name: None,
            },
            OrderSearch {
                status: None,
                member_name: Some("kim".to_string()),
            },
            OrderSearch {
                status: Some(OrderStatus::Cancel),
                member_name: Some("kim".to_string()),
            },
        ];

        for search in &filters {
            let by_string: Vec<i64> = repo
                .find_all_by_string(search)
                .await?
                .iter()
                .map(|o| o.order_id)
                .collect();
            let by_predicate: Vec<i64> = repo
                .find_all_by_predicate(search)
                .await?
                .iter()
                .map(|o| o.order_id)
                .collect();
            assert_eq!(by_string, by_predicate, "filter: {search:?}");
        }
        Ok(())
    }

    #[sqlx::test(fixtures(path = "../../fixtures", scripts("members", "items", "orders")))]
    async fn search_filters_compose_as_conjunction(pool: SqlitePool) -> sqlx::Result<()> {
        let repo = OrderRepository::new(pool, 100);

        let all = repo.find_all_by_string(&OrderSearch::default()).await?;
        assert_eq!(all.len(), 3);

        let canceled = repo
            .find_all_by_string(&OrderSearch {
                status: Some(OrderStatus::Cancel),
                member_name: None,
            })
            .await?;
        assert_eq!(canceled.len(), 1);
        assert_eq!(canceled[0].order_id, 3);

        // substring match: "user" hits both userA and userB
        let by_name = repo
            .find_all_by_string(&OrderSearch {
                status: None,
                member_name: Some("user".to_string()),
            })
            .await?;
        assert_eq!(by_name.len(), 2);

        let both = repo
            .find_all_by_string(&OrderSearch {
                status: Some(OrderStatus::Cancel),
                member_name: Some("kim".to_string()),
            })
            .await?;
        assert_eq!(both.len(), 1);
        assert_eq!(both[0].order_id, 3);

        // a blank name must not add a predicate
        let blank = repo
            .find_all_by_string(&OrderSearch {
                status: None,
                member_name: Some("  ".to_string()),
            })
            .await?;
        assert_eq!(blank.len(), 3);
        Ok(())
    }

    /*----------------------------------- */
    /* Collection join and flat DTOs      */
    /*----------------------------------- */

    #[sqlx::test(fixtures(path = "../../fixtures", scripts("members", "items", "orders")))]
    async fn collection_join_deduplicates_roots(pool: SqlitePool) -> sqlx::Result<()> {
        let repo = OrderRepository::new(pool, 100);

        let joined = repo.find_all_with_item().await?;

        // 5 joined rows fold back into 3 distinct roots
        assert_eq!(joined.len(), 3);
        let counts: Vec<usize> = joined.iter().map(|g| g.order_items.len()).collect();
        assert_eq!(counts, vec![2, 2, 1]);

        // and the folded graphs equal the two-phase ones
        let mut two_phase = repo.find_all_with_member_delivery().await?;
        repo.attach_order_items(&mut two_phase).await?;
        assert_eq!(joined, two_phase);
        Ok(())
    }

    #[sqlx::test(fixtures(path = "../../fixtures", scripts("members", "items", "orders")))]
    async fn flat_dto_query_matches_graph_projection(pool: SqlitePool) -> sqlx::Result<()> {
        let repo = OrderRepository::new(pool, 100);

        let flat = repo.find_order_dtos().await?;

        let mut graphs = repo.find_all_with_member_delivery().await?;
        repo.attach_order_items(&mut graphs).await?;
        let projected: Vec<OrderDTO> = graphs.iter().map(OrderDTO::from).collect();

        assert_eq!(flat, projected);
        Ok(())
    }

    /*----------------------------------- */
    /* Write path                         */
    /*----------------------------------- */

    #[sqlx::test(fixtures(path = "../../fixtures", scripts("members", "items")))]
    async fn place_persists_order_delivery_line_and_stock(pool: SqlitePool) -> sqlx::Result<()> {
        let repo = OrderRepository::new(pool.clone(), 100);
        let member = Member {
            member_id: 1,
            name: "userA".to_string(),
            address: Address::new("Seoul", "1", "11111"),
        };
        let mut item = Item {
            item_id: 1,
            name: "JPA1 BOOK".to_string(),
            price: 10000,
            stock_quantity: 100,
            kind: ItemKind::Book {
                author: Some("kim".to_string()),
                isbn: Some("11111".to_string()),
            },
        };
        item.remove_stock(10).unwrap();

        let order = repo.place(&member, &item, 10).await?;

        let mut graphs = repo.find_all_with_member_delivery().await?;
        repo.attach_order_items(&mut graphs).await?;
        assert_eq!(graphs.len(), 1);
        assert_eq!(graphs[0].order.order_id, order.order_id);
        assert_eq!(graphs[0].delivery.address.city, "Seoul");
        assert_eq!(graphs[0].order_items.len(), 1);
        assert_eq!(graphs[0].order_items[0].order_item.order_price, 10000);
        assert_eq!(graphs[0].total_price(), 100000);

        let (stock,): (i64,) =
            sqlx::query_as("SELECT stock_quantity FROM items WHERE item_id = 1")
                .fetch_one(&pool)
                .await?;
        assert_eq!(stock, 90);
        Ok(())
    }

    #[sqlx::test(fixtures(path = "../../fixtures", scripts("members", "items", "orders")))]
    async fn cancel_restores_stock_per_line(pool: SqlitePool) -> sqlx::Result<()> {
        let repo = OrderRepository::new(pool.clone(), 100);

        // order 1 has lines (item 1 x1, item 2 x2)
        let mut order = repo.read(&1).await?.unwrap();
        order.cancel().unwrap();
        repo.cancel(&order).await?;

        let reloaded = repo.read(&1).await?.unwrap();
        assert_eq!(reloaded.order_status, OrderStatus::Cancel);

        let (stock1,): (i64,) =
            sqlx::query_as("SELECT stock_quantity FROM items WHERE item_id = 1")
                .fetch_one(&pool)
                .await?;
        let (stock2,): (i64,) =
            sqlx::query_as("SELECT stock_quantity FROM items WHERE item_id = 2")
                .fetch_one(&pool)
                .await?;
        assert_eq!(stock1, 101);
        assert_eq!(stock2, 102);
        Ok(())
    }
}
