//! # Service Registry
//!
//! `#[service]`/`#[repository]` 매크로가 생성하는 싱글톤들을 타입 기반으로 찾아 주는
//! 의존성 주입 컨테이너입니다.
//!
//! ## 동작 방식
//!
//! ```text
//! 컴파일 타임
//!    ├─ #[service(name = "order")]      → ServiceRegistration { name: "order_service" }
//!    └─ #[repository(name = "product")] → RepositoryRegistration { name: "product_repository" }
//!
//! 런타임
//!    ├─ ServiceLocator::set(Arc<Database>)      인프라 컴포넌트 수동 등록
//!    ├─ ServiceLocator::initialize_all()        리포지토리 → 서비스 순서로 생성
//!    └─ ServiceLocator::get::<OrderService>()   Arc<T> 필드 자동 주입 시 호출
//! ```
//!
//! 타입 이름에서 `Service`/`Repository` 접미사를 떼고 소문자로 바꾼 값이
//! 매크로의 `name` 인자와 같아야 합니다. 예를 들어 `RazorpayService`는
//! `#[service(name = "razorpay")]`로 선언해야 주입 시 찾을 수 있습니다.

use std::any::{Any, TypeId};
use std::collections::{HashMap, HashSet};
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};
use async_trait::async_trait;
use once_cell::sync::Lazy;
use crate::utils::display_terminal::{
    print_boxed_title, print_cache_initialized, print_final_summary, print_step_complete,
    print_step_start, print_sub_task,
};

/// `#[service]` 매크로가 구현하는 서비스 trait
#[async_trait]
pub trait Service: Send + Sync {
    fn name(&self) -> &str;

    async fn init(&self) -> Result<(), Box<dyn std::error::Error>>;
}

/// `#[repository]` 매크로가 구현하는 리포지토리 trait
#[async_trait]
pub trait Repository: Send + Sync {
    fn name(&self) -> &str;

    fn collection_name(&self) -> &str;

    async fn init(&self) -> Result<(), Box<dyn std::error::Error>>;
}

/// `#[service]` 매크로가 `inventory`에 제출하는 등록 정보
pub struct ServiceRegistration {
    pub name: &'static str,
    pub constructor: fn() -> Box<dyn Any + Send + Sync>,
}

/// `#[repository]` 매크로가 `inventory`에 제출하는 등록 정보
pub struct RepositoryRegistration {
    pub name: &'static str,
    pub constructor: fn() -> Box<dyn Any + Send + Sync>,
}

inventory::collect!(ServiceRegistration);
inventory::collect!(RepositoryRegistration);

/// 등록 이름에서 접미사를 뗀 키 → 생성자
static SERVICE_CONSTRUCTORS: Lazy<HashMap<String, fn() -> Box<dyn Any + Send + Sync>>> =
    Lazy::new(|| {
        let cache: HashMap<_, _> = inventory::iter::<ServiceRegistration>()
            .map(|r| (strip_suffix(r.name, "_service"), r.constructor))
            .collect();
        print_cache_initialized("Service", cache.len());
        cache
    });

static REPOSITORY_CONSTRUCTORS: Lazy<HashMap<String, fn() -> Box<dyn Any + Send + Sync>>> =
    Lazy::new(|| {
        let cache: HashMap<_, _> = inventory::iter::<RepositoryRegistration>()
            .map(|r| (strip_suffix(r.name, "_repository"), r.constructor))
            .collect();
        print_cache_initialized("Repository", cache.len());
        cache
    });

fn strip_suffix(name: &str, suffix: &str) -> String {
    name.strip_suffix(suffix).unwrap_or(name).to_string()
}

/// 타입 ID 기반 싱글톤 저장소
pub struct ServiceLocator {
    instances: RwLock<HashMap<TypeId, Arc<dyn Any + Send + Sync>>>,
    resolving: RwLock<HashSet<TypeId>>,
}

static LOCATOR: Lazy<ServiceLocator> = Lazy::new(|| ServiceLocator {
    instances: RwLock::new(HashMap::new()),
    resolving: RwLock::new(HashSet::new()),
});

/// 해석이 끝나면(패닉 포함) 순환 감지 집합에서 타입을 제거합니다.
struct ResolvingGuard(TypeId);

impl Drop for ResolvingGuard {
    fn drop(&mut self) {
        write(&LOCATOR.resolving).remove(&self.0);
    }
}

fn read<T>(lock: &RwLock<T>) -> RwLockReadGuard<'_, T> {
    lock.read().unwrap_or_else(|poisoned| poisoned.into_inner())
}

fn write<T>(lock: &RwLock<T>) -> RwLockWriteGuard<'_, T> {
    lock.write().unwrap_or_else(|poisoned| poisoned.into_inner())
}

impl ServiceLocator {
    /// 타입 `T`의 싱글톤을 반환합니다.
    ///
    /// 이미 등록된 인스턴스가 없으면 매크로 등록 정보로 생성합니다.
    /// 생성자는 잠금 밖에서 호출되므로 생성 중 다른 의존성을 해석해도 교착되지 않습니다.
    ///
    /// # Panics
    ///
    /// * 순환 의존성이 감지된 경우
    /// * 등록되지 않은 타입을 요청한 경우
    pub fn get<T: 'static + Send + Sync>() -> Arc<T> {
        let type_id = TypeId::of::<T>();
        let type_name = std::any::type_name::<T>();

        if let Some(instance) = Self::lookup::<T>(type_id) {
            return instance;
        }

        if !write(&LOCATOR.resolving).insert(type_id) {
            log::error!("Circular dependency detected for type: {}", type_name);
            panic!("Circular dependency detected: {} is already being initialized", type_name);
        }
        let _guard = ResolvingGuard(type_id);

        let instance = Self::construct::<T>(type_name);

        let mut instances = write(&LOCATOR.instances);
        let stored = instances
            .entry(type_id)
            .or_insert_with(|| instance as Arc<dyn Any + Send + Sync>)
            .clone();
        drop(instances);

        match stored.downcast::<T>() {
            Ok(instance) => instance,
            Err(_) => panic!("Type mismatch in ServiceLocator for {}", type_name),
        }
    }

    fn lookup<T: 'static + Send + Sync>(type_id: TypeId) -> Option<Arc<T>> {
        read(&LOCATOR.instances)
            .get(&type_id)
            .cloned()
            .and_then(|instance| instance.downcast::<T>().ok())
    }

    fn construct<T: 'static + Send + Sync>(type_name: &str) -> Arc<T> {
        let short_name = Self::short_type_name(type_name);

        let (registry, key) = if let Some(base) = short_name.strip_suffix("Repository") {
            (&*REPOSITORY_CONSTRUCTORS, base.to_lowercase())
        } else if let Some(base) = short_name.strip_suffix("Service") {
            (&*SERVICE_CONSTRUCTORS, base.to_lowercase())
        } else {
            panic!(
                "Service not found: {}. Register it with #[service]/#[repository] or ServiceLocator::set()",
                type_name
            );
        };

        let constructor = registry
            .get(&key)
            .unwrap_or_else(|| panic!("No registration named '{}' for {}", key, type_name));

        match constructor().downcast::<Arc<T>>() {
            Ok(instance) => *instance,
            Err(_) => panic!("Type mismatch for registration '{}' ({})", key, type_name),
        }
    }

    fn short_type_name(type_name: &str) -> &str {
        type_name.rsplit("::").next().unwrap_or(type_name)
    }

    /// 매크로 밖에서 만든 인프라 컴포넌트(Database, RedisClient 등)를 등록합니다.
    pub fn set<T: 'static + Send + Sync>(instance: Arc<T>) {
        let type_name = std::any::type_name::<T>();
        log::info!("📦 Registering: {}", Self::short_type_name(type_name));

        write(&LOCATOR.instances).insert(TypeId::of::<T>(), instance as Arc<dyn Any + Send + Sync>);
    }

    /// 등록된 모든 리포지토리와 서비스를 미리 생성합니다.
    ///
    /// 리포지토리를 먼저 만들어 서비스 생성 시 주입될 수 있도록 합니다.
    pub async fn initialize_all() -> Result<(), Box<dyn std::error::Error>> {
        print_boxed_title("🔄 INITIALIZING STOREFRONT REGISTRY");

        let repositories: Vec<_> = inventory::iter::<RepositoryRegistration>().collect();
        if !repositories.is_empty() {
            print_step_start(1, "Creating repositories");
            for registration in &repositories {
                let _instance = (registration.constructor)();
                print_sub_task(registration.name, "✓ Created");
            }
            print_step_complete(1, "Repositories ready", repositories.len());
        }

        let services: Vec<_> = inventory::iter::<ServiceRegistration>().collect();
        if !services.is_empty() {
            print_step_start(2, "Creating services");
            for registration in &services {
                let _instance = (registration.constructor)();
                print_sub_task(registration.name, "✓ Created");
            }
            print_step_complete(2, "Services ready", services.len());
        }

        print_final_summary(repositories.len(), services.len());

        Ok(())
    }
}
