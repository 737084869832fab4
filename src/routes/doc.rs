use utoipa::{OpenApi, openapi::OpenApi as OpenApiSpec};
use utoipa_scalar::{Scalar, Servable};

use crate::{
    dto::{
        auth::{LoginRequest, RegisterRequest},
        cart::{
            AddToCartRequest, CartView, RemovedItems, SelectedTotal, SelectionRequest,
            SetQuantityRequest,
        },
        orders::{CheckoutRequest, OrderList, PlaceOrderRequest, UpdateOrderStatusRequest},
        products::{
            PageRequest, ProductList, SearchRequest, SortRequest, ToggleRequest, VisibilityRequest,
        },
    },
    models::{
        DeliveryInfo, Order, OrderItem, OrderStatus, PaymentMethod, Product, ProfileUpdate,
        SelectedItem, User,
    },
    response::{ApiResponse, Meta},
    routes::{auth, cart, health, orders, params, products as product_routes, shop},
    store::{
        cart::{CartLine, CartTotals},
        filters::{FilterState, SortMode},
        listing::ProductPage,
        session::SessionState,
    },
};

#[derive(OpenApi)]
#[openapi(
    paths(
        health::health_check,
        auth::login,
        auth::register,
        auth::logout,
        auth::session,
        auth::update_profile,
        auth::clear_error,
        product_routes::list_products,
        product_routes::get_product,
        product_routes::related_products,
        shop::current_filters,
        shop::set_search,
        shop::set_visibility,
        shop::toggle_category,
        shop::toggle_sub_category,
        shop::set_sort,
        shop::clear_filters,
        shop::set_page,
        cart::cart_list,
        cart::add_to_cart,
        cart::set_quantity,
        cart::clear_cart,
        cart::remove_selected,
        cart::selected_total,
        orders::list_orders,
        orders::place_order,
        orders::checkout,
        orders::get_order,
        orders::update_order_status,
        orders::cancel_order
    ),
    components(
        schemas(
            User,
            ProfileUpdate,
            Product,
            SelectedItem,
            Order,
            OrderItem,
            OrderStatus,
            PaymentMethod,
            DeliveryInfo,
            SessionState,
            FilterState,
            SortMode,
            ProductPage,
            CartLine,
            CartTotals,
            CartView,
            SelectedTotal,
            RemovedItems,
            ProductList,
            OrderList,
            LoginRequest,
            RegisterRequest,
            AddToCartRequest,
            SetQuantityRequest,
            SelectionRequest,
            PlaceOrderRequest,
            CheckoutRequest,
            UpdateOrderStatusRequest,
            SearchRequest,
            VisibilityRequest,
            ToggleRequest,
            SortRequest,
            PageRequest,
            params::OrderListQuery,
            Meta,
            ApiResponse<Product>,
            ApiResponse<ProductPage>,
            ApiResponse<SessionState>,
            ApiResponse<CartView>,
            ApiResponse<Order>,
            ApiResponse<OrderList>
        )
    ),
    tags(
        (name = "Health", description = "Health check endpoint"),
        (name = "Auth", description = "Session and account endpoints"),
        (name = "Products", description = "Catalog endpoints"),
        (name = "Shop", description = "Search, filter, sort and paging controls"),
        (name = "Cart", description = "Cart endpoints"),
        (name = "Orders", description = "Order endpoints"),
    )
)]
pub struct ApiDoc;

pub fn scalar_docs() -> Scalar<OpenApiSpec> {
    Scalar::with_url("/docs", ApiDoc::openapi())
}
