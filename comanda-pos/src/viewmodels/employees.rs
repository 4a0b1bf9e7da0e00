//! Employee administration screen (manager only)

use std::sync::Arc;

use shared::{Employee, EmployeeCreate, Role};
use tokio::task::JoinHandle;

use super::ViewStatus;
use crate::auth::AuthService;
use crate::core::AppState;
use crate::state::Observable;

pub struct EmployeesViewModel {
    auth: Arc<AuthService>,
    pub status: ViewStatus,
    pub employees: Observable<Vec<Employee>>,
}

impl EmployeesViewModel {
    pub fn new(state: &AppState) -> Self {
        Self {
            auth: state.auth.clone(),
            status: ViewStatus::default(),
            employees: Observable::default(),
        }
    }

    pub async fn load(&self) {
        if let Some(list) = self
            .status
            .track("Error al cargar empleados", self.auth.list_employees())
            .await
        {
            self.employees.set(list);
        }
    }

    pub fn spawn_load(self: &Arc<Self>) -> JoinHandle<()> {
        let vm = Arc::clone(self);
        tokio::spawn(async move { vm.load().await })
    }

    pub async fn create(&self, email: &str, password: &str, role: Role) -> bool {
        let data = EmployeeCreate {
            email: email.to_string(),
            password: password.to_string(),
            role,
        };
        let Some(employee) = self
            .status
            .track("Error al crear empleado", self.auth.create_employee(data))
            .await
        else {
            return false;
        };
        self.status.info(format!(
            "Empleado {} creado como {}.",
            employee.email,
            employee.role.as_str()
        ));
        self.load().await;
        true
    }

    pub fn spawn_create(
        self: &Arc<Self>,
        email: String,
        password: String,
        role: Role,
    ) -> JoinHandle<bool> {
        let vm = Arc::clone(self);
        tokio::spawn(async move { vm.create(&email, &password, role).await })
    }

    pub async fn change_role(&self, uid: &str, role: Role) -> bool {
        if self
            .status
            .track("Error al cambiar el rol", self.auth.update_role(uid, role))
            .await
            .is_none()
        {
            return false;
        }
        self.status
            .info(format!("Rol actualizado a {}.", role.as_str()));
        self.load().await;
        true
    }

    pub async fn delete(&self, uid: &str) -> bool {
        if self
            .status
            .track("Error al eliminar empleado", self.auth.delete_employee(uid))
            .await
            .is_none()
        {
            return false;
        }
        self.status.info("Empleado eliminado.");
        self.load().await;
        true
    }

    pub fn spawn_delete(self: &Arc<Self>, uid: String) -> JoinHandle<bool> {
        let vm = Arc::clone(self);
        tokio::spawn(async move { vm.delete(&uid).await })
    }

    pub fn spawn_change_role(self: &Arc<Self>, uid: String, role: Role) -> JoinHandle<bool> {
        let vm = Arc::clone(self);
        tokio::spawn(async move { vm.change_role(&uid, role).await })
    }
}
